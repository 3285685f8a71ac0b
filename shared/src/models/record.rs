//! Sketch and design records
//!
//! Both are phase-numbered artifacts (1..=3). The customer selects at
//! most one record per order; a new phase is only drafted while nothing
//! is selected and the phase limit is not reached.

use serde::{Deserialize, Serialize};

/// Highest phase a sketch or design can be redrafted to.
pub const MAX_PHASE: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSketch {
    pub id: String,
    pub service_order_id: String,
    pub phase: u8,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_selected: bool,
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDesign {
    pub id: String,
    pub service_order_id: String,
    pub phase: u8,
    #[serde(default)]
    pub design_images: Vec<String>,
    #[serde(default)]
    pub is_selected: bool,
    pub creation_date: Option<String>,
}

/// Selection payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSelect {
    pub is_selected: bool,
}

/// Common view over sketch and design records.
pub trait PhaseRecord {
    fn id(&self) -> &str;
    fn phase(&self) -> u8;
    fn is_selected(&self) -> bool;
}

impl PhaseRecord for RecordSketch {
    fn id(&self) -> &str {
        &self.id
    }
    fn phase(&self) -> u8 {
        self.phase
    }
    fn is_selected(&self) -> bool {
        self.is_selected
    }
}

impl PhaseRecord for RecordDesign {
    fn id(&self) -> &str {
        &self.id
    }
    fn phase(&self) -> u8 {
        self.phase
    }
    fn is_selected(&self) -> bool {
        self.is_selected
    }
}

/// The selected record, if any.
pub fn selected<R: PhaseRecord>(records: &[R]) -> Option<&R> {
    records.iter().find(|r| r.is_selected())
}

/// Highest phase drafted so far (0 when nothing was drafted).
pub fn current_phase<R: PhaseRecord>(records: &[R]) -> u8 {
    records.iter().map(PhaseRecord::phase).max().unwrap_or(0)
}

/// Records of the current phase only.
pub fn latest<R: PhaseRecord>(records: &[R]) -> Vec<&R> {
    let phase = current_phase(records);
    records.iter().filter(|r| r.phase() == phase).collect()
}

/// Whether the customer may still ask for another phase.
pub fn can_redraft<R: PhaseRecord>(records: &[R]) -> bool {
    selected(records).is_none() && current_phase(records) < MAX_PHASE
}
