//! Text moderation for reviews and feedback
//!
//! Two providers are consulted: the OpenAI moderation endpoint and
//! Google Perspective (TOXICITY). Text is flagged if either flags it.
//! One provider failing is tolerated as long as the other answered.

use serde_json::{Value, json};

use crate::config::ModerationConfig;
use crate::error::{ClientError, ClientResult};

const OPENAI_URL: &str = "https://api.openai.com/v1/moderations";
const PERSPECTIVE_URL: &str = "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

/// Combined moderation result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModerationVerdict {
    pub flagged: bool,
    /// OpenAI categories that triggered
    pub categories: Vec<String>,
    /// Perspective TOXICITY summary score
    pub toxicity: Option<f64>,
}

/// Flagged categories from an OpenAI moderation response, or `None`
/// when the body has no result.
pub fn parse_openai_response(body: &Value) -> Option<(bool, Vec<String>)> {
    let result = body.get("results")?.get(0)?;
    let flagged = result.get("flagged")?.as_bool()?;
    let mut categories: Vec<String> = result
        .get("categories")
        .and_then(Value::as_object)
        .map(|cats| {
            cats.iter()
                .filter(|(_, hit)| hit.as_bool() == Some(true))
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default();
    categories.sort();
    Some((flagged, categories))
}

/// TOXICITY summary score from a Perspective response.
pub fn parse_perspective_response(body: &Value) -> Option<f64> {
    body.pointer("/attributeScores/TOXICITY/summaryScore/value")?
        .as_f64()
}

/// Moderation client
#[derive(Debug, Clone)]
pub struct ModerationClient {
    client: reqwest::Client,
    config: ModerationConfig,
}

impl ModerationClient {
    pub fn new(config: ModerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn openai(&self, key: &str, text: &str) -> ClientResult<(bool, Vec<String>)> {
        let body: Value = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(key)
            .json(&json!({ "input": text }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_openai_response(&body)
            .ok_or_else(|| ClientError::Moderation("malformed OpenAI response".into()))
    }

    async fn perspective(&self, key: &str, text: &str) -> ClientResult<f64> {
        let body: Value = self
            .client
            .post(PERSPECTIVE_URL)
            .query(&[("key", key)])
            .json(&json!({
                "comment": { "text": text },
                "languages": ["vi", "en"],
                "requestedAttributes": { "TOXICITY": {} },
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_perspective_response(&body)
            .ok_or_else(|| ClientError::Moderation("malformed Perspective response".into()))
    }

    /// Check `text` against every configured provider.
    pub async fn check(&self, text: &str) -> ClientResult<ModerationVerdict> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(ModerationVerdict::default());
        }

        let openai = async {
            match self.config.openai_api_key.as_deref() {
                Some(key) => Some(self.openai(key, text).await),
                None => None,
            }
        };
        let perspective = async {
            match self.config.perspective_api_key.as_deref() {
                Some(key) => Some(self.perspective(key, text).await),
                None => None,
            }
        };
        let (openai, perspective) = tokio::join!(openai, perspective);
        combine(openai, perspective, self.config.toxicity_threshold)
    }
}

/// Merge provider answers. `None` means the provider is not configured.
fn combine(
    openai: Option<ClientResult<(bool, Vec<String>)>>,
    perspective: Option<ClientResult<f64>>,
    threshold: f64,
) -> ClientResult<ModerationVerdict> {
    let mut verdict = ModerationVerdict::default();
    let mut answered = false;
    let mut failures = Vec::new();

    match openai {
        Some(Ok((flagged, categories))) => {
            answered = true;
            verdict.flagged |= flagged;
            verdict.categories = categories;
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "OpenAI moderation failed");
            failures.push(e.to_string());
        }
        None => {}
    }
    match perspective {
        Some(Ok(score)) => {
            answered = true;
            verdict.flagged |= score >= threshold;
            verdict.toxicity = Some(score);
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Perspective moderation failed");
            failures.push(e.to_string());
        }
        None => {}
    }

    if !answered && !failures.is_empty() {
        return Err(ClientError::Moderation(failures.join("; ")));
    }
    if !answered {
        tracing::debug!("No moderation provider configured");
    }
    Ok(verdict)
}
