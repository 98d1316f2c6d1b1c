//! Client side of the dashboard: fetches from the data service, keeps the
//! render state of each flow and draws it as text.

pub mod client;
pub mod display;
pub mod fetch;
pub mod filter;
pub mod grid;
pub mod health;
pub mod list;
pub mod render;

use crate::config::{Config, DEFAULT_POLL_INTERVAL_SECS};
use crate::error::ClientResult;
use crate::model::HealthStatus;
use client::DashboardClient;
use fetch::{FetchController, FetchView};
use filter::FilterWidget;
use grid::NavKey;
use health::HealthPoller;
use list::UserList;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
}

impl DashboardSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            base_url: cfg.base_url(),
            poll_interval: Duration::from_secs(
                cfg.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            request_timeout: cfg.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// A mounted dashboard view. Health polling runs for as long as it is
/// mounted.
pub struct Dashboard {
    fetch: Arc<FetchController>,
    health: HealthPoller,
    list: UserList,
}

impl Dashboard {
    /// Start health polling and the initial unfiltered load.
    pub fn mount(settings: &DashboardSettings, filter: Box<dyn FilterWidget>) -> ClientResult<Self> {
        let client = DashboardClient::new(&settings.base_url, settings.request_timeout)?;
        let health = HealthPoller::start(client.clone(), settings.poll_interval);
        let dashboard = Self {
            fetch: Arc::new(FetchController::new(client)),
            health,
            list: UserList::new(filter),
        };
        dashboard.submit("");
        info!("Dashboard mounted against {}", settings.base_url);
        Ok(dashboard)
    }

    /// Fire a search. Earlier searches still in flight are not cancelled;
    /// their results are dropped if they land late.
    pub fn submit(&self, query: &str) -> JoinHandle<bool> {
        let fetch = self.fetch.clone();
        let query = query.to_string();
        tokio::spawn(async move { fetch.search(&query).await })
    }

    /// Replace the table with the aggregate "All Users" row.
    pub fn show_aggregate(&self) -> JoinHandle<bool> {
        let fetch = self.fetch.clone();
        tokio::spawn(async move { fetch.load_aggregate().await })
    }

    /// Feed a line to the filter widget, searching if it submitted.
    pub fn handle_input(&mut self, line: &str) -> Option<JoinHandle<bool>> {
        let query = self.list.handle_input(line)?;
        Some(self.submit(&query))
    }

    pub fn navigate(&mut self, key: NavKey) -> bool {
        let rows = self.fetch.view().rows.len();
        self.list.sync_rows(rows);
        self.list.navigate(key)
    }

    pub fn view(&self) -> FetchView {
        self.fetch.view()
    }

    pub fn health(&self) -> HealthStatus {
        self.health.status()
    }

    pub fn fetch_changes(&self) -> watch::Receiver<u64> {
        self.fetch.subscribe()
    }

    pub fn health_changes(&self) -> watch::Receiver<HealthStatus> {
        self.health.subscribe()
    }

    /// Draw the whole page: health header, error banner and the user list.
    pub fn render(&mut self) -> String {
        let view = self.fetch.view();
        self.list.sync_rows(view.rows.len());
        let mut out = vec![render::health_line(self.health.status())];
        if let Some(err) = view.error() {
            out.push(render::error_banner(err));
        }
        out.push(self.list.render(&view));
        out.join("\n")
    }

    /// Stop health polling. Searches still in flight finish on their own.
    pub async fn unmount(self) {
        self.health.stop().await;
        info!("Dashboard unmounted");
    }
}
