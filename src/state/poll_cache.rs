use crate::error::ApiError;
use crate::models::poll::Poll;
use log::{debug, error};

/// Snapshot of the last poll listing plus the derived "already voted" flag.
#[derive(Debug, Default)]
pub struct PollCache {
    polls: Vec<Poll>,
    has_voted: bool,
}

impl PollCache {
    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    /// Stores a fetch result. A failed fetch leaves an empty list behind,
    /// never the previous one.
    pub fn apply_fetch(&mut self, result: Result<Vec<Poll>, ApiError>, authenticated: bool) {
        match result {
            Ok(polls) => {
                self.has_voted = authenticated && any_my_votes(&polls);
                debug!(
                    "Cached {} polls (authenticated: {}, voted: {})",
                    polls.len(),
                    authenticated,
                    self.has_voted
                );
                self.polls = polls;
            }
            Err(e) => {
                error!("Failed to load polls: {}", e);
                self.polls.clear();
                self.has_voted = false;
            }
        }
    }

    pub fn mark_voted(&mut self) {
        self.has_voted = true;
    }

    pub fn reset_vote_state(&mut self) {
        self.has_voted = false;
    }
}

pub fn any_my_votes(polls: &[Poll]) -> bool {
    polls
        .iter()
        .flat_map(|poll| poll.choices())
        .any(|choice| choice.has_my_vote())
}
