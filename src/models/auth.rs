use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Body of `/login/` and `/register/`. A rejected request carries `error`
/// instead of `token`.
#[derive(Deserialize, Debug, Default)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error payloads the API produces: `{"error": ..}`, `{"detail": ..}`,
/// `{"non_field_errors": [..]}` or a bare list of messages.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ErrorBody {
    Object {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        detail: Option<String>,
        #[serde(default)]
        non_field_errors: Vec<String>,
    },
    Messages(Vec<String>),
}

impl ErrorBody {
    pub fn message(self) -> Option<String> {
        match self {
            ErrorBody::Object {
                error,
                detail,
                non_field_errors,
            } => error
                .or(detail)
                .or_else(|| non_field_errors.into_iter().next()),
            ErrorBody::Messages(messages) => messages.into_iter().next(),
        }
        .filter(|m| !m.trim().is_empty())
    }

    pub fn parse(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::message)
    }
}
