use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequest {
    pub choice: u64,
}

/// Per-question result of one submission.
#[derive(Debug)]
pub struct VoteOutcome {
    pub question_id: u64,
    pub choice_id: u64,
    pub result: Result<(), crate::error::ApiError>,
}
