//! Cron trigger registry of one job

use std::sync::{Arc, Mutex};

use bubble_client::JobApi;
use bubble_core::domain::cron::CronType;
use bubble_core::dto::cron::CronEntry;
use tracing::{debug, warn};

use crate::lock;
use crate::state::LoadState;

/// Cron triggers attached to one job
///
/// The local list only changes after the master confirms a change; there
/// is no optimistic update and nothing to roll back.
pub struct CronRegistry {
    job: String,
    api: Arc<dyn JobApi>,
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    /// In the master's order
    items: Vec<CronEntry>,
    load_state: LoadState,
}

impl CronRegistry {
    /// Creates an empty registry without contacting the master
    pub fn new(api: Arc<dyn JobApi>, job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            api,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Creates a registry and loads its triggers in the background
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(api: Arc<dyn JobApi>, job: impl Into<String>) -> Arc<Self> {
        let registry = Arc::new(Self::new(api, job));
        lock(&registry.inner).load_state = LoadState::Loading;

        let background = Arc::clone(&registry);
        tokio::spawn(async move { background.reload().await });

        registry
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    /// Snapshot of the triggers
    pub fn items(&self) -> Vec<CronEntry> {
        lock(&self.inner).items.clone()
    }

    pub fn load_state(&self) -> LoadState {
        lock(&self.inner).load_state.clone()
    }

    /// Replaces the local list with the master's
    pub async fn reload(&self) {
        lock(&self.inner).load_state = LoadState::Loading;

        let result = self.api.list_crons(&self.job).await;

        let mut inner = lock(&self.inner);
        match result {
            Ok(items) => {
                debug!("Loaded {} cron(s) of job {}", items.len(), self.job);
                inner.items = items;
                inner.load_state = LoadState::Idle;
            }
            Err(e) => {
                warn!("Failed to list crons of job {}: {}", self.job, e);
                inner.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Adds a trigger of the given kind
    ///
    /// # Returns
    /// The entry the master created, appended to the list, or `None` if the
    /// master refused or could not be reached.
    pub async fn add(&self, kind: CronType) -> Option<CronEntry> {
        match self.api.add_cron(&self.job, kind).await {
            Ok(entry) => {
                debug!("Added cron {} ({}) to job {}", entry.id, entry.kind, self.job);
                lock(&self.inner).items.push(entry.clone());
                Some(entry)
            }
            Err(e) => {
                warn!("Failed to add {} cron to job {}: {}", kind, self.job, e);
                None
            }
        }
    }

    /// Removes a trigger by id
    ///
    /// # Returns
    /// `true` if the master confirmed and a local entry was removed. An id
    /// that is not in the list leaves it untouched.
    pub async fn remove(&self, id: &str) -> bool {
        if let Err(e) = self.api.remove_cron(&self.job, id).await {
            warn!("Failed to remove cron {} of job {}: {}", id, self.job, e);
            return false;
        }

        let mut inner = lock(&self.inner);
        match inner.items.iter().position(|entry| entry.id == id) {
            Some(pos) => {
                inner.items.remove(pos);
                true
            }
            None => false,
        }
    }
}
