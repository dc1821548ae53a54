use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Updated,
    Failed,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Updated => write!(f, "updated"),
            OutcomeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one attempted mutation against a single order.
///
/// Records are appended in attempt order during a run and written out once at
/// the end; nothing is carried between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub order_id: i64,
    pub status: OutcomeStatus,
    pub reason: String,
}

impl OutcomeRecord {
    #[must_use]
    pub fn updated(order_id: i64, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            status: OutcomeStatus::Updated,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn failed(order_id: i64, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            status: OutcomeStatus::Failed,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}
