use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Login or registration rejected.
    #[error("{message}")]
    Auth { message: String },

    #[error("failed to fetch polls (HTTP {status})")]
    Fetch { status: u16 },

    #[error("vote for choice {choice_id} rejected (HTTP {status}): {message}")]
    Vote {
        choice_id: u64,
        status: u16,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Auth { message } => message.clone(),
            ApiError::Vote { message, .. } => message.clone(),
            ApiError::Fetch { status } => format!("Server answered with HTTP {status}"),
            ApiError::Transport(_) => "Could not reach the server".to_owned(),
            ApiError::Decode(_) => "The server sent an unexpected response".to_owned(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode session: {0}")]
    Serialize(#[from] serde_json::Error),
}
