use crate::error::ApiError;
use crate::models::poll::Poll;
use crate::models::session::Session;
use crate::models::vote::VoteOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }
}

/// Results reported back to the UI loop by background tasks.
#[derive(Debug)]
pub enum Event {
    PollsLoaded {
        request_id: u64,
        authenticated: bool,
        result: Result<Vec<Poll>, ApiError>,
    },
    AuthFinished {
        epoch: u64,
        mode: AuthMode,
        result: Result<Session, ApiError>,
    },
    VotesSubmitted {
        epoch: u64,
        outcomes: Vec<VoteOutcome>,
    },
}
