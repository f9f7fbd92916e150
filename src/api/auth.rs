use crate::api::endpoint;
use crate::error::ApiError;
use crate::models::auth::{AuthResponse, Credentials, ErrorBody};
use crate::models::session::Session;
use log::{debug, error, info};
use reqwest::Client;

pub async fn login(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Session, ApiError> {
    authenticate(client, base_url, "login", credentials, "invalid credentials").await
}

pub async fn register(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Session, ApiError> {
    authenticate(
        client,
        base_url,
        "register",
        credentials,
        "registration failed",
    )
    .await
}

async fn authenticate(
    client: &Client,
    base_url: &str,
    path: &str,
    credentials: &Credentials,
    fallback: &str,
) -> Result<Session, ApiError> {
    let url = endpoint(base_url, path);
    debug!("Authenticating {} via {}", credentials.username, url);
    let resp = client.post(&url).json(credentials).send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    let response = serde_json::from_str::<AuthResponse>(&body).unwrap_or_default();

    match response.token {
        Some(token) if status.is_success() => {
            info!("{} succeeded for {}", path, credentials.username);
            Ok(Session {
                token,
                username: response
                    .username
                    .unwrap_or_else(|| credentials.username.clone()),
            })
        }
        _ => {
            let message = response
                .error
                .or_else(|| ErrorBody::parse(&body))
                .unwrap_or_else(|| fallback.to_owned());
            error!(
                "{} failed for {} (HTTP {}): {}",
                path, credentials.username, status, message
            );
            Err(ApiError::Auth { message })
        }
    }
}
