//! Job monitor
//!
//! Polls one page of a job's runners on a fixed interval and reconciles the
//! result against the runners it already knows. A runner seen again is
//! refreshed in place instead of replaced, so command log state loaded by a
//! front-end survives every poll.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bubble_client::JobApi;
use bubble_core::dto::runner::RunnerPage;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::PortalConfig;
use crate::lock;
use crate::runner::RunnerState;
use crate::state::{LoadState, Tickets};

/// Paginated, periodically refreshed view of a job's runners
pub struct JobMonitor {
    shared: Arc<MonitorShared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct MonitorShared {
    api: Arc<dyn JobApi>,
    config: PortalConfig,
    state: Mutex<MonitorState>,
}

#[derive(Default)]
struct MonitorState {
    target: Option<String>,
    /// Current page, in the master's order
    runners: Vec<Arc<RunnerState>>,
    /// Every runner seen since the last bind, by id
    runner_map: HashMap<String, Arc<RunnerState>>,
    /// One-based page index
    index: usize,
    total: usize,
    per_page: usize,
    load_state: LoadState,
    tickets: Tickets,
    /// Bumped on every bind so replies for a previous target are dropped
    generation: u64,
}

impl MonitorState {
    fn rebind(&mut self, target: String) {
        *self = MonitorState {
            target: Some(target),
            index: 1,
            load_state: LoadState::Loading,
            generation: self.generation + 1,
            ..MonitorState::default()
        };
    }
}

impl JobMonitor {
    /// Creates an unbound monitor
    pub fn new(api: Arc<dyn JobApi>, config: PortalConfig) -> Self {
        Self {
            shared: Arc::new(MonitorShared {
                api,
                config,
                state: Mutex::new(MonitorState {
                    index: 1,
                    ..MonitorState::default()
                }),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Binds the monitor to a job
    ///
    /// Binding to a new job drops every known runner and resets the page to
    /// the first one. Binding to the current job, or to an empty name, does
    /// nothing. The refresh timer is started on first bind and keeps running
    /// until [`destroy`](Self::destroy); the first refresh happens one
    /// interval later.
    ///
    /// Must be called within a tokio runtime.
    pub fn bind(&self, target: impl Into<String>) {
        let target = target.into();
        if target.is_empty() {
            return;
        }

        {
            let mut state = lock(&self.shared.state);
            if state.target.as_deref() == Some(target.as_str()) {
                return;
            }
            info!("Binding monitor to job {}", target);
            state.rebind(target);
        }

        let mut timer = lock(&self.timer);
        if timer.is_none() {
            *timer = Some(start_timer(Arc::clone(&self.shared)));
        }
    }

    /// Stops the refresh timer
    ///
    /// A refresh already in flight still completes. Safe to call repeatedly.
    pub fn destroy(&self) {
        if let Some(handle) = lock(&self.timer).take() {
            debug!("Stopping monitor timer");
            handle.abort();
        }
    }

    /// Refreshes the current page now, outside the timer schedule
    pub async fn navigate(&self) {
        self.shared.refresh().await;
    }

    /// Selects the one-based page the next refresh fetches
    pub fn set_index(&self, index: usize) {
        lock(&self.shared.state).index = index.max(1);
    }

    /// Runner by id among every runner seen since the last bind
    pub fn get_runner(&self, id: &str) -> Option<Arc<RunnerState>> {
        lock(&self.shared.state).runner_map.get(id).cloned()
    }

    /// Runners of the current page
    pub fn runners(&self) -> Vec<Arc<RunnerState>> {
        lock(&self.shared.state).runners.clone()
    }

    pub fn target(&self) -> Option<String> {
        lock(&self.shared.state).target.clone()
    }

    /// One-based page index
    pub fn index(&self) -> usize {
        lock(&self.shared.state).index
    }

    pub fn total(&self) -> usize {
        lock(&self.shared.state).total
    }

    pub fn per_page(&self) -> usize {
        lock(&self.shared.state).per_page
    }

    /// Number of pages, as of the last refresh
    pub fn page_count(&self) -> usize {
        let state = lock(&self.shared.state);
        if state.per_page == 0 {
            0
        } else {
            state.total.div_ceil(state.per_page)
        }
    }

    /// Number of runners tracked since the last bind
    pub fn known_runners(&self) -> usize {
        lock(&self.shared.state).runner_map.len()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.shared.state).load_state.is_loading()
    }

    pub fn load_state(&self) -> LoadState {
        lock(&self.shared.state).load_state.clone()
    }

    /// Whether the refresh timer is running
    pub fn is_running(&self) -> bool {
        lock(&self.timer).is_some()
    }
}

impl Drop for JobMonitor {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl MonitorShared {
    async fn refresh(&self) {
        let (target, page, ticket, generation) = {
            let mut state = lock(&self.state);
            let Some(target) = state.target.clone() else {
                return;
            };
            state.load_state = LoadState::Loading;
            (
                target,
                state.index.saturating_sub(1),
                state.tickets.issue(),
                state.generation,
            )
        };

        debug!("Refreshing job {} page {}", target, page);
        let result = self.api.list_runners(&target, page).await;

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!("Dropping runners of job {}, monitor was rebound", target);
            return;
        }

        let settled = match result {
            Ok(page) => {
                if state.tickets.accept(ticket) {
                    self.apply(&mut state, &target, page);
                } else {
                    debug!("Dropping stale runner page of job {}", target);
                }
                LoadState::Idle
            }
            Err(e) => {
                warn!("Failed to refresh runners of job {}: {}", target, e);
                LoadState::Failed(e.to_string())
            }
        };

        if state.tickets.is_latest(ticket) {
            state.load_state = settled;
        }
    }

    /// Merges a fetched page into the known runners
    fn apply(&self, state: &mut MonitorState, target: &str, page: RunnerPage) {
        state.total = page.total;
        state.per_page = page.perpage;
        state.runners.clear();

        for record in page.runners {
            let runner = match state.runner_map.get(&record.id).cloned() {
                Some(existing) => {
                    existing.refresh(&record);
                    existing
                }
                None => {
                    let created = Arc::new(RunnerState::new(
                        Arc::clone(&self.api),
                        target,
                        &record,
                        &self.config,
                    ));
                    state
                        .runner_map
                        .insert(record.id.clone(), Arc::clone(&created));
                    created
                }
            };
            state.runners.push(runner);
        }

        debug!(
            "Job {}: {} runner(s) on page, {} tracked, {} total",
            target,
            state.runners.len(),
            state.runner_map.len(),
            state.total
        );
    }
}

/// Spawns the refresh timer
///
/// Each tick starts its own refresh, so a slow master never delays the
/// schedule. Ordering of the replies is handled by the ticket check.
fn start_timer(shared: Arc<MonitorShared>) -> JoinHandle<()> {
    let period = shared.config.refresh_interval;

    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let shared = Arc::clone(&shared);
            tokio::spawn(async move { shared.refresh().await });
        }
    })
}
