//! Error response bodies
//!
//! The backend reports failures either as a plain string, as
//! `{"message": "..."}` or as an RFC 7807 problem document with a
//! `title` and per-field `errors`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Problem body returned with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiProblem {
    /// Parse a response body. Returns `None` unless the body is a JSON
    /// object carrying at least one human-readable field.
    pub fn parse(body: &str) -> Option<Self> {
        let problem: Self = serde_json::from_str(body).ok()?;
        if problem.message.is_none()
            && problem.title.is_none()
            && problem.detail.is_none()
            && problem.errors.is_empty()
        {
            return None;
        }
        Some(problem)
    }

    /// Most specific message available. Field errors are joined as
    /// `field: reason` pairs.
    pub fn summary(&self) -> String {
        if let Some(message) = self.message.as_ref().or(self.detail.as_ref()) {
            return message.clone();
        }
        if !self.errors.is_empty() {
            return self
                .errors
                .iter()
                .flat_map(|(field, reasons)| reasons.iter().map(move |r| format!("{field}: {r}")))
                .collect::<Vec<_>>()
                .join("; ");
        }
        self.title.clone().unwrap_or_default()
    }
}
