#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-process stand-in for the poll API.
#[derive(Default)]
pub struct FakeApi {
    /// username -> (password, token)
    pub users: HashMap<String, (String, String)>,
    /// (username, choice id), in arrival order
    pub votes: Vec<(String, u64)>,
    pub vote_bodies: Vec<Value>,
    /// Authorization header of every poll listing
    pub poll_auth: Vec<Option<String>>,
    pub failing_choices: HashSet<u64>,
    pub paginated: bool,
    pub polls_status: Option<u16>,
}

pub type SharedApi = Arc<Mutex<FakeApi>>;

impl FakeApi {
    pub fn with_user(mut self, username: &str, password: &str, token: &str) -> Self {
        self.users.insert(
            username.to_owned(),
            (password.to_owned(), token.to_owned()),
        );
        self
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Token ")?;
        self.users
            .iter()
            .find(|(_, (_, t))| t == token)
            .map(|(name, _)| name.clone())
    }
}

/// Two questions: 1 -> choices 5, 6 and 2 -> choices 9, 10.
const LAYOUT: &[(u64, &str, &[(u64, &str)])] = &[
    (1, "Best witcher school?", &[(5, "Wolf"), (6, "Cat")]),
    (2, "Best monster?", &[(9, "Leshen"), (10, "Striga")]),
];

fn render_polls(api: &FakeApi, viewer: Option<&str>) -> Vec<Value> {
    let questions: Vec<Value> = LAYOUT
        .iter()
        .map(|(question_id, text, choices)| {
            let ids: Vec<u64> = choices.iter().map(|(id, _)| *id).collect();
            let total = api.votes.iter().filter(|(_, c)| ids.contains(c)).count();
            let choices: Vec<Value> = choices
                .iter()
                .map(|(choice_id, text)| {
                    let count = api.votes.iter().filter(|(_, c)| c == choice_id).count();
                    let percentage = if total == 0 {
                        0.0
                    } else {
                        (count as f64 / total as f64 * 1000.0).round() / 10.0
                    };
                    let my_votes: Vec<usize> = api
                        .votes
                        .iter()
                        .enumerate()
                        .filter(|(_, (user, c))| Some(user.as_str()) == viewer && c == choice_id)
                        .map(|(i, _)| i + 1)
                        .collect();
                    json!({
                        "id": choice_id,
                        "text": text,
                        "vote_count": count,
                        "percentage": percentage,
                        "my_votes": my_votes,
                    })
                })
                .collect();
            json!({"id": question_id, "text": text, "choices": choices})
        })
        .collect();

    vec![json!({
        "id": 1,
        "title": "The Witcher",
        "date_created": "2025-01-10T12:00:00.000000Z",
        "questions": questions,
    })]
}

async fn polls(State(api): State<SharedApi>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let mut api = api.lock().unwrap();
    api.poll_auth.push(
        headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned),
    );
    if let Some(status) = api.polls_status {
        return (
            StatusCode::from_u16(status).unwrap(),
            Json(json!({"detail": "unavailable"})),
        );
    }
    let viewer = api.user_for(&headers);
    let polls = render_polls(&api, viewer.as_deref());
    let body = if api.paginated {
        json!({"count": polls.len(), "next": null, "previous": null, "results": polls})
    } else {
        Value::Array(polls)
    };
    (StatusCode::OK, Json(body))
}

fn credentials(body: &Value) -> (String, String) {
    let field = |name: &str| body[name].as_str().unwrap_or_default().to_owned();
    (field("username"), field("password"))
}

async fn login(State(api): State<SharedApi>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let api = api.lock().unwrap();
    let (username, password) = credentials(&body);
    match api.users.get(&username) {
        Some((expected, token)) if *expected == password => (
            StatusCode::OK,
            Json(json!({"token": token, "username": username})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid username or password"})),
        ),
    }
}

async fn register(
    State(api): State<SharedApi>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut api = api.lock().unwrap();
    let (username, password) = credentials(&body);
    if api.users.contains_key(&username) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "User already exists"})),
        );
    }
    let token = format!("token-{}", username);
    api.users
        .insert(username.clone(), (password, token.clone()));
    (
        StatusCode::OK,
        Json(json!({"token": token, "username": username})),
    )
}

async fn vote(
    State(api): State<SharedApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut api = api.lock().unwrap();
    api.vote_bodies.push(body.clone());
    let Some(user) = api.user_for(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        );
    };
    let Some(choice) = body["choice"].as_u64() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"choice": ["This field is required."]})),
        );
    };
    if api.failing_choices.contains(&choice) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "choice closed"})),
        );
    }
    if api.votes.iter().any(|(u, c)| *u == user && *c == choice) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!(["You have already voted for this choice."])),
        );
    }
    api.votes.push((user, choice));
    (StatusCode::CREATED, Json(json!({"choice": choice})))
}

/// Serves `api` on an ephemeral port and returns the API base address.
pub async fn spawn(api: SharedApi) -> String {
    let app = Router::new()
        .route("/api/polls/", get(polls))
        .route("/api/login/", post(login))
        .route("/api/register/", post(register))
        .route("/api/vote/", post(vote))
        .with_state(api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

pub fn shared(api: FakeApi) -> SharedApi {
    Arc::new(Mutex::new(api))
}
