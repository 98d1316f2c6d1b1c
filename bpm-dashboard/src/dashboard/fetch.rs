//! Data-fetch flow of the dashboard.
//!
//! Every dispatch takes a request token from a monotonically increasing
//! counter. A result is applied only while its token is still the latest one
//! issued, so an out-of-order response from an older search can never
//! overwrite a newer one.

use super::client::DashboardClient;
use super::display::display_users;
use crate::error::{ClientError, ClientResult};
use crate::model::UserRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The JSON document the service answered with, kept as sent. What it
/// means for the table is decided by [`display_users`].
pub type Payload = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

pub type RequestToken = u64;

/// Everything the list view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchView {
    pub state: FetchState,
    pub rows: Vec<UserRecord>,
    pub last_searched: String,
}

impl FetchView {
    pub fn loading(&self) -> bool {
        matches!(self.state, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Inner {
    latest: RequestToken,
    view: FetchView,
}

/// Single writer for the data-fetch state.
pub struct FetchController {
    client: DashboardClient,
    inner: Mutex<Inner>,
    changed: watch::Sender<u64>,
}

impl FetchController {
    pub fn new(client: DashboardClient) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            client,
            inner: Mutex::new(Inner::default()),
            changed,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.changed.send_modify(|v| *v = v.wrapping_add(1));
    }

    /// Receiver that ticks on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    pub fn view(&self) -> FetchView {
        self.lock().view.clone()
    }

    /// Enter `Loading` for a new request. Rows from the previous result stay
    /// visible until this one resolves.
    pub fn begin(&self, query: &str) -> RequestToken {
        let token = {
            let mut inner = self.lock();
            inner.latest += 1;
            inner.view.state = FetchState::Loading;
            inner.view.last_searched = query.trim().to_string();
            inner.latest
        };
        self.notify();
        debug!(token, "Fetch started");
        token
    }

    /// Apply the outcome of request `token`. Returns `false` when the request
    /// has been superseded and the outcome was dropped.
    pub fn complete(&self, token: RequestToken, outcome: ClientResult<Payload>) -> bool {
        {
            let mut inner = self.lock();
            if token != inner.latest {
                debug!(token, latest = inner.latest, "Discarding superseded response");
                return false;
            }
            match outcome {
                Ok(payload) => {
                    inner.view.rows = display_users(Some(&payload));
                    inner.view.state = FetchState::Success;
                    info!(token, rows = inner.view.rows.len(), "Fetch succeeded");
                }
                Err(e) => {
                    warn!(token, "Fetch failed: {}", e);
                    inner.view.rows.clear();
                    inner.view.state = FetchState::Error(e.to_string());
                }
            }
        }
        self.notify();
        true
    }

    /// Leave `Loading` without a result, e.g. when the request future was
    /// dropped. Rows are kept and no error is shown.
    fn abandon(&self, token: RequestToken) {
        {
            let mut inner = self.lock();
            if token != inner.latest || !inner.view.loading() {
                return;
            }
            inner.view.state = FetchState::Idle;
        }
        debug!(token, "Fetch abandoned");
        self.notify();
    }

    async fn run<F>(&self, query: &str, fetch: F) -> bool
    where
        F: std::future::Future<Output = ClientResult<Payload>>,
    {
        let token = self.begin(query);
        let guard = Pending {
            controller: self,
            token,
            settled: false,
        };
        let outcome = fetch.await;
        guard.settle(outcome)
    }

    /// Search users by name; a blank query loads everyone.
    pub async fn search(&self, query: &str) -> bool {
        let fetch = self.client.search_users(query);
        self.run(query, fetch).await
    }

    /// Load the cross-user aggregate from `/data-all`.
    pub async fn load_aggregate(&self) -> bool {
        let fetch = self.client.fetch_aggregate();
        self.run("", fetch).await
    }
}

/// Clears `Loading` for its token however the request ends.
struct Pending<'a> {
    controller: &'a FetchController,
    token: RequestToken,
    settled: bool,
}

impl Pending<'_> {
    fn settle(mut self, outcome: Result<Payload, ClientError>) -> bool {
        self.settled = true;
        self.controller.complete(self.token, outcome)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.abandon(self.token);
        }
    }
}
