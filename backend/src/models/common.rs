use serde::{Deserialize, Serialize};

/// Request lifecycle status. The wire strings are fixed. Any status may move
/// to any other status; the workflow classifies, it does not order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "re-submitted")]
    Resubmitted,
    #[serde(rename = "under process")]
    UnderProcess,
    #[serde(rename = "action needed")]
    ActionNeeded,
    #[serde(rename = "completed")]
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Submitted,
        RequestStatus::Resubmitted,
        RequestStatus::UnderProcess,
        RequestStatus::ActionNeeded,
        RequestStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Submitted => "submitted",
            RequestStatus::Resubmitted => "re-submitted",
            RequestStatus::UnderProcess => "under process",
            RequestStatus::ActionNeeded => "action needed",
            RequestStatus::Completed => "completed",
        }
    }
}
