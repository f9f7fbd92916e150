use crate::api::{endpoint, token_header};
use crate::error::ApiError;
use crate::models::auth::ErrorBody;
use crate::models::vote::{VoteOutcome, VoteRequest};
use futures_util::future::join_all;
use log::{debug, error, info};
use reqwest::Client;

pub async fn cast_vote(
    client: &Client,
    base_url: &str,
    token: &str,
    choice_id: u64,
) -> Result<(), ApiError> {
    let url = endpoint(base_url, "vote");
    debug!("Casting vote for choice {}", choice_id);
    let resp = client
        .post(&url)
        .header("Authorization", token_header(token))
        .json(&VoteRequest { choice: choice_id })
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        info!("Vote for choice {} accepted", choice_id);
        return Ok(());
    }

    let body = resp.text().await.unwrap_or_default();
    let message = ErrorBody::parse(&body).unwrap_or_else(|| "vote was not accepted".to_owned());
    error!("Vote for choice {} rejected (HTTP {}): {}", choice_id, status, message);
    Err(ApiError::Vote {
        choice_id,
        status: status.as_u16(),
        message,
    })
}

/// Sends one vote per `(question, choice)` pair concurrently and waits for
/// all of them. Outcomes keep the input order.
pub async fn cast_votes(
    client: &Client,
    base_url: &str,
    token: &str,
    selections: &[(u64, u64)],
) -> Vec<VoteOutcome> {
    let calls = selections.iter().map(|&(question_id, choice_id)| async move {
        VoteOutcome {
            question_id,
            choice_id,
            result: cast_vote(client, base_url, token, choice_id).await,
        }
    });
    join_all(calls).await
}
