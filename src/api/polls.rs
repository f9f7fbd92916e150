use crate::api::{endpoint, token_header};
use crate::error::ApiError;
use crate::models::poll::{Poll, PollList};
use log::{error, info};
use reqwest::Client;

/// Fetches every poll. The token is optional; without it the server answers
/// as for a guest.
pub async fn list_polls(
    client: &Client,
    base_url: &str,
    token: Option<&str>,
) -> Result<Vec<Poll>, ApiError> {
    let url = endpoint(base_url, "polls");
    let mut request = client.get(&url);
    if let Some(token) = token {
        request = request.header("Authorization", token_header(token));
    }
    let resp = request.send().await?;
    if !resp.status().is_success() {
        error!("Failed to list polls: HTTP {}", resp.status());
        return Err(ApiError::Fetch {
            status: resp.status().as_u16(),
        });
    }

    let body = resp.text().await?;
    let polls = serde_json::from_str::<PollList>(&body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .into_polls();
    info!("Received {} polls", polls.len());
    Ok(polls)
}
