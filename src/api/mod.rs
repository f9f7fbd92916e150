pub mod auth;
pub mod polls;
pub mod vote;

use std::time::Duration;

use reqwest::Client;

/// Builds `<base>/<path>/`; the API expects trailing slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), path)
}

pub(crate) fn token_header(token: &str) -> String {
    format!("Token {}", token)
}

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        assert_eq!(
            endpoint("http://127.0.0.1:8000/api", "polls"),
            "http://127.0.0.1:8000/api/polls/"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8000/api/", "vote"),
            "http://127.0.0.1:8000/api/vote/"
        );
    }
}
