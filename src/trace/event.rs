use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line in the fill trace (JSONL). Stages: scan, gate, snapshot,
/// mapping, apply.
#[derive(Debug, Serialize)]
pub struct FillEvent {
    pub timestamp_ms: u128,
    pub stage: String,

    pub container: Option<String>,
    pub field: Option<String>,

    pub outcome: Option<String>,
    pub detail: Option<String>,
}

impl FillEvent {
    pub fn now(stage: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            stage: stage.to_string(),
            container: None,
            field: None,
            outcome: None,
            detail: None,
        }
    }

    pub fn with_container(mut self, container: impl ToString) -> Self {
        self.container = Some(container.to_string());
        self
    }

    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
