use crate::api::auth::{login, register};
use crate::api::build_client;
use crate::api::polls::list_polls;
use crate::api::vote::cast_votes;
use crate::config::AppConfig;
use crate::models::auth::Credentials;
use crate::models::events::{AuthMode, Event};
use crate::models::poll::{Choice, Poll};
use crate::models::session::Session;
use crate::models::vote::VoteOutcome;
use crate::state::poll_cache::PollCache;
use crate::state::selection::SelectionTracker;
use crate::store::session::SessionStore;
use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Guest,
    AuthenticatedNotVoted,
    AuthenticatedVoted,
}

/// Login/registration dialog.
#[derive(Debug)]
pub struct AuthForm {
    pub open: bool,
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub pending: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            open: false,
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            error: None,
            pending: false,
        }
    }
}

/// Blocking message shown until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// Whole client state, owned by the UI loop. Network work runs on the tokio
/// runtime and reports back through [`Event`]s.
pub struct AppState {
    pub api_base: String,
    pub auth_form: AuthForm,
    pub notice: Option<Notice>,
    pub status_message: String,
    client: Client,
    runtime: Handle,
    store: SessionStore,
    session: Option<Session>,
    cache: PollCache,
    selection: SelectionTracker,
    loading: bool,
    submitting: bool,
    // False from a session change until that session's listing has been applied.
    votes_known: bool,
    // Only the latest poll request is applied.
    poll_request: u64,
    // Bumped on login, logout and a cancelled dialog; auth and vote results
    // from an older epoch are dropped.
    epoch: u64,
    event_sender: Sender<Event>,
    event_receiver: Receiver<Event>,
}

impl AppState {
    pub fn new(config: &AppConfig, runtime: Handle) -> Result<Self, reqwest::Error> {
        let client = build_client(config.request_timeout())?;
        let (event_sender, event_receiver) = channel();
        Ok(Self {
            api_base: config.api_base.clone(),
            auth_form: AuthForm::default(),
            notice: None,
            status_message: "Idle".to_owned(),
            client,
            runtime,
            store: SessionStore::new(config.session_dir()),
            session: None,
            cache: PollCache::default(),
            selection: SelectionTracker::default(),
            loading: false,
            submitting: false,
            votes_known: false,
            poll_request: 0,
            epoch: 0,
            event_sender,
            event_receiver,
        })
    }

    /// Restores a saved session, if any, and loads the polls for it.
    pub fn init(&mut self) {
        self.session = self.store.restore();
        match &self.session {
            Some(session) => info!("Resuming session for {}", session.username),
            None => info!("Starting as guest"),
        }
        self.refresh();
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn polls(&self) -> &[Poll] {
        self.cache.polls()
    }

    pub fn has_voted(&self) -> bool {
        self.cache.has_voted()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn selected(&self, question_id: u64) -> Option<u64> {
        self.selection.selected(question_id)
    }

    pub fn view_state(&self) -> ViewState {
        match (self.is_authenticated(), self.has_voted()) {
            (false, _) => ViewState::Guest,
            (true, false) => ViewState::AuthenticatedNotVoted,
            (true, true) => ViewState::AuthenticatedVoted,
        }
    }

    /// Whether HasVoted reflects the current session yet.
    pub fn votes_known(&self) -> bool {
        self.votes_known
    }

    pub fn is_clickable(&self, choice: &Choice) -> bool {
        self.view_state() == ViewState::AuthenticatedNotVoted
            && self.votes_known
            && !choice.has_my_vote()
    }

    pub fn shows_stats(&self) -> bool {
        self.view_state() == ViewState::AuthenticatedVoted
    }

    pub fn can_submit(&self) -> bool {
        self.view_state() == ViewState::AuthenticatedNotVoted
            && self.votes_known
            && !self.submitting
            && self.selection.all_answered(self.cache.polls())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.submitting || self.auth_form.pending
    }

    /// Refetches the poll list with the current token, superseding any
    /// request still in flight.
    pub fn refresh(&mut self) {
        self.poll_request += 1;
        self.loading = true;
        let request_id = self.poll_request;
        let token = self.session.as_ref().map(|s| s.token.clone());
        let client = self.client.clone();
        let base_url = self.api_base.clone();
        let sender = self.event_sender.clone();
        debug!("Fetching polls (request {})", request_id);

        self.runtime.spawn(async move {
            let result = list_polls(&client, &base_url, token.as_deref()).await;
            let event = Event::PollsLoaded {
                request_id,
                authenticated: token.is_some(),
                result,
            };
            if sender.send(event).is_err() {
                debug!("Poll listing finished after the UI went away");
            }
        });
    }

    pub fn open_auth(&mut self, mode: AuthMode) {
        self.auth_form.open = true;
        self.auth_form.mode = mode;
        self.auth_form.error = None;
    }

    /// Closes the dialog; a login still in flight is abandoned.
    pub fn close_auth(&mut self) {
        if self.auth_form.pending {
            self.epoch += 1;
        }
        self.auth_form = AuthForm::default();
    }

    /// Sends whatever the dialog currently holds.
    pub fn submit_auth(&mut self) {
        let username = self.auth_form.username.trim().to_owned();
        let password = self.auth_form.password.clone();
        self.authenticate(self.auth_form.mode, username, password);
    }

    pub fn login(&mut self, username: &str, password: &str) {
        self.authenticate(AuthMode::Login, username.to_owned(), password.to_owned());
    }

    pub fn register(&mut self, username: &str, password: &str) {
        self.authenticate(AuthMode::Register, username.to_owned(), password.to_owned());
    }

    fn authenticate(&mut self, mode: AuthMode, username: String, password: String) {
        if self.auth_form.pending {
            return;
        }
        self.auth_form.mode = mode;
        if username.is_empty() || password.is_empty() {
            self.auth_form.error = Some("Username and password are required".to_owned());
            return;
        }

        self.auth_form.error = None;
        self.auth_form.pending = true;
        let epoch = self.epoch;
        let client = self.client.clone();
        let base_url = self.api_base.clone();
        let sender = self.event_sender.clone();
        let credentials = Credentials { username, password };

        self.runtime.spawn(async move {
            let result = match mode {
                AuthMode::Login => login(&client, &base_url, &credentials).await,
                AuthMode::Register => register(&client, &base_url, &credentials).await,
            };
            if sender
                .send(Event::AuthFinished {
                    epoch,
                    mode,
                    result,
                })
                .is_err()
            {
                debug!("{} finished after the UI went away", mode.label());
            }
        });
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to remove saved session: {}", e);
        }
        if let Some(session) = self.session.take() {
            info!("{} signed out", session.username);
        }
        self.epoch += 1;
        self.selection.clear();
        self.cache.reset_vote_state();
        self.votes_known = false;
        self.submitting = false;
        self.auth_form = AuthForm::default();
        self.status_message = "Signed out".to_owned();
        self.refresh();
    }

    /// Records a pick; ignored for guests and once the user has voted.
    pub fn select(&mut self, question_id: u64, choice_id: u64) -> bool {
        if !self.votes_known {
            return false;
        }
        let authenticated = self.is_authenticated();
        let has_voted = self.has_voted();
        self.selection
            .select(question_id, choice_id, authenticated, has_voted)
    }

    /// Casts one vote per answered question, all at once.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let Some(token) = self.session.as_ref().map(|s| s.token.clone()) else {
            return false;
        };

        let questions: HashSet<u64> = self
            .cache
            .polls()
            .iter()
            .flat_map(|p| p.questions.iter().map(|q| q.id))
            .collect();
        let selections: Vec<(u64, u64)> = self
            .selection
            .answered()
            .into_iter()
            .filter(|(question_id, _)| questions.contains(question_id))
            .collect();

        self.submitting = true;
        self.status_message = "Sending votes...".to_owned();
        let epoch = self.epoch;
        let client = self.client.clone();
        let base_url = self.api_base.clone();
        let sender = self.event_sender.clone();
        info!("Submitting {} votes", selections.len());

        self.runtime.spawn(async move {
            let outcomes = cast_votes(&client, &base_url, &token, &selections).await;
            if sender
                .send(Event::VotesSubmitted { epoch, outcomes })
                .is_err()
            {
                debug!("Votes finished after the UI went away");
            }
        });
        true
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Applies every event that has arrived so far. Returns how many.
    pub fn process_events(&mut self) -> usize {
        let mut pending = Vec::new();
        while let Ok(event) = self.event_receiver.try_recv() {
            pending.push(event);
        }
        let count = pending.len();
        for event in pending {
            self.apply(event);
        }
        count
    }

    /// Blocks until one event arrives or `timeout` passes. Returns whether an
    /// event was applied.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.event_receiver.recv_timeout(timeout) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(_) => false,
        }
    }

    pub fn apply(&mut self, event: Event) {
        match event {
            Event::PollsLoaded {
                request_id,
                authenticated,
                result,
            } => {
                if request_id != self.poll_request {
                    debug!("Dropping superseded poll listing {}", request_id);
                    return;
                }
                self.loading = false;
                self.votes_known = true;
                let failed = result.is_err();
                self.cache.apply_fetch(result, authenticated);
                if failed {
                    self.status_message = "Could not load polls".to_owned();
                } else if self.status_message == "Idle" {
                    self.status_message = format!("Loaded {} polls", self.cache.polls().len());
                }
            }
            Event::AuthFinished {
                epoch,
                mode,
                result,
            } => {
                if epoch != self.epoch {
                    debug!("Dropping stale {} result", mode.label());
                    return;
                }
                self.auth_form.pending = false;
                match result {
                    Ok(session) => self.start_session(session),
                    Err(e) => {
                        self.auth_form.error = Some(e.user_message());
                        self.auth_form.password.clear();
                    }
                }
            }
            Event::VotesSubmitted { epoch, outcomes } => {
                if epoch != self.epoch {
                    warn!("Dropping vote results from a previous session");
                    return;
                }
                self.submitting = false;
                self.finish_submission(outcomes);
            }
        }
    }

    fn start_session(&mut self, session: Session) {
        if let Err(e) = self.store.save(&session) {
            warn!("Failed to persist session: {}", e);
        }
        self.status_message = format!("Signed in as {}", session.username);
        self.session = Some(session);
        self.epoch += 1;
        self.selection.clear();
        self.cache.reset_vote_state();
        self.votes_known = false;
        self.close_auth();
        self.refresh();
    }

    fn finish_submission(&mut self, outcomes: Vec<VoteOutcome>) {
        let total = outcomes.len();
        let failures: Vec<&VoteOutcome> = outcomes.iter().filter(|o| o.result.is_err()).collect();

        if failures.is_empty() {
            self.cache.mark_voted();
            self.selection.clear();
            self.status_message = "Votes submitted".to_owned();
            self.notice = Some(Notice {
                title: "Thank you".to_owned(),
                message: "Your vote has been counted!".to_owned(),
                is_error: false,
            });
            self.refresh();
            return;
        }

        let accepted = total - failures.len();
        for failure in &failures {
            if let Err(e) = &failure.result {
                warn!("Vote for question {} failed: {}", failure.question_id, e);
            }
        }
        let reason = failures
            .first()
            .and_then(|o| o.result.as_ref().err())
            .map(|e| e.user_message())
            .unwrap_or_default();
        self.status_message = "Vote submission failed".to_owned();
        self.notice = Some(Notice {
            title: "Voting failed".to_owned(),
            message: format!(
                "{} of {} votes were not accepted: {}. {} of {} may already be recorded by the server.",
                failures.len(),
                total,
                reason,
                accepted,
                total
            ),
            is_error: true,
        });
    }
}
