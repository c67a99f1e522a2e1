//! Command step state and log tailing

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use bubble_client::{ClientError, JobApi};
use bubble_core::domain::status::Status;
use bubble_core::dto::runner::CommandRecord;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, warn};

use crate::config::PortalConfig;
use crate::lock;
use crate::state::{LoadState, Tickets};

/// One command step of a runner
///
/// Holds the step's status and, once [`load`](Self::load)ed, its log text.
/// While the step is active the log is re-fetched on a fixed delay by a
/// background task, until [`reset`](Self::reset) or the step finishes.
pub struct CommandState {
    index: usize,
    name: String,
    alias: String,
    target: String,
    runner_id: String,
    api: Arc<dyn JobApi>,
    poll_interval: Duration,
    inner: Mutex<CommandInner>,
}

struct CommandInner {
    status: Status,
    measure: i64,
    /// `None` until the first successful fetch
    logs: Option<String>,
    /// Whether the whole log is requested instead of its tail
    log_full: bool,
    /// Whether the last applied fetch actually returned the whole log
    log_is_full: bool,
    /// Whether polling may continue
    questing: bool,
    load_state: LoadState,
    tickets: Tickets,
    poller: Option<JoinHandle<()>>,
}

impl CommandState {
    pub(crate) fn new(
        api: Arc<dyn JobApi>,
        target: &str,
        runner_id: &str,
        record: &CommandRecord,
        config: &PortalConfig,
    ) -> Self {
        Self {
            index: record.index,
            name: record.name.clone(),
            alias: config.display_alias(&record.alias),
            target: target.to_string(),
            runner_id: runner_id.to_string(),
            api,
            poll_interval: config.log_poll_interval,
            inner: Mutex::new(CommandInner {
                status: record.status,
                measure: record.measure,
                logs: None,
                log_full: false,
                log_is_full: false,
                questing: true,
                load_state: LoadState::Idle,
                tickets: Tickets::default(),
                poller: None,
            }),
        }
    }

    /// Position of the step within its runner
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display alias, already shortened
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn status(&self) -> Status {
        lock(&self.inner).status
    }

    pub fn measure(&self) -> i64 {
        lock(&self.inner).measure
    }

    /// Decoded log text, `None` if never fetched
    pub fn logs(&self) -> Option<String> {
        lock(&self.inner).logs.clone()
    }

    pub fn log_full(&self) -> bool {
        lock(&self.inner).log_full
    }

    pub fn log_is_full(&self) -> bool {
        lock(&self.inner).log_is_full
    }

    pub fn is_questing(&self) -> bool {
        lock(&self.inner).questing
    }

    /// Whether a polling task is currently scheduled
    pub fn is_polling(&self) -> bool {
        lock(&self.inner)
            .poller
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// True until the log has been fetched once
    pub fn is_loading(&self) -> bool {
        lock(&self.inner).logs.is_none()
    }

    pub fn load_state(&self) -> LoadState {
        lock(&self.inner).load_state.clone()
    }

    /// Applies fresh status and measure from a runner page
    pub fn refresh(&self, record: &CommandRecord) {
        let mut inner = lock(&self.inner);
        inner.status = record.status;
        inner.measure = record.measure;
    }

    /// Starts showing this step's log
    ///
    /// Fetches the log if it was never fetched or the step is still active,
    /// and keeps polling while it stays active. Calling this while polling
    /// is already running does not start a second loop.
    ///
    /// Must be called within a tokio runtime.
    pub fn load(self: &Arc<Self>) {
        let needed = {
            let mut inner = lock(&self.inner);
            inner.questing = true;
            inner.logs.is_none() || inner.status.is_active()
        };

        if needed {
            self.ensure_polling(None);
        }
    }

    /// Switches to the whole log and fetches it right away
    ///
    /// A polling task started here waits one interval before its first
    /// fetch.
    pub async fn quest_full(self: &Arc<Self>) {
        lock(&self.inner).log_full = true;
        self.fetch_logs().await;

        if self.wants_polling() {
            self.ensure_polling(Some(self.poll_interval));
        }
    }

    /// Stops polling after the current fetch; loaded logs are kept
    pub fn reset(&self) {
        lock(&self.inner).questing = false;
    }

    fn wants_polling(&self) -> bool {
        let inner = lock(&self.inner);
        inner.questing && inner.status.is_active()
    }

    /// Reschedule check of the polling task
    ///
    /// Releases the task slot in the same critical section as the decision,
    /// so a concurrent `load` either sees the loop continue or starts a new one.
    fn keep_polling(&self) -> bool {
        let mut inner = lock(&self.inner);
        if inner.questing && inner.status.is_active() {
            true
        } else {
            inner.poller = None;
            false
        }
    }

    fn ensure_polling(self: &Arc<Self>, delay: Option<Duration>) {
        let mut inner = lock(&self.inner);
        if inner
            .poller
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
        {
            return;
        }

        inner.poller = Some(tokio::spawn(poll_logs(Arc::downgrade(self), delay)));
    }

    async fn fetch_logs(&self) {
        let (ticket, full) = {
            let mut inner = lock(&self.inner);
            inner.load_state = LoadState::Loading;
            (inner.tickets.issue(), inner.log_full)
        };

        let result = self
            .api
            .command_log(&self.target, &self.runner_id, self.index, full)
            .await
            .and_then(|chunk| {
                chunk
                    .decode()
                    .map(|text| (text, chunk.full))
                    .map_err(|e| ClientError::DecodeError(e.to_string()))
            });

        let mut inner = lock(&self.inner);
        let settled = match result {
            Ok((text, is_full)) => {
                if inner.tickets.accept(ticket) {
                    debug!(
                        "Loaded {} bytes of log for {}/{} step {}",
                        text.len(),
                        self.target,
                        self.runner_id,
                        self.index
                    );
                    inner.logs = Some(text);
                    inner.log_is_full = is_full;
                }
                LoadState::Idle
            }
            Err(e) => {
                warn!(
                    "Failed to fetch log of {}/{} step {}: {}",
                    self.target, self.runner_id, self.index, e
                );
                LoadState::Failed(e.to_string())
            }
        };

        if inner.tickets.is_latest(ticket) {
            inner.load_state = settled;
        }
    }
}

impl Drop for CommandState {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.inner).poller.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandState")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("runner_id", &self.runner_id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Log polling loop of one command
///
/// Holds only a weak reference between fetches, so dropping the command
/// ends the loop. Whether to go on is decided after every fetch and again
/// when the delay elapses, never in the middle of a request. With no
/// initial `delay` the first fetch happens immediately.
async fn poll_logs(command: Weak<CommandState>, mut delay: Option<Duration>) {

    loop {
        if let Some(delay) = delay {
            time::sleep(delay).await;
        }

        let Some(cmd) = command.upgrade() else {
            return;
        };
        if delay.is_some() && !cmd.keep_polling() {
            return;
        }

        cmd.fetch_logs().await;

        if !cmd.keep_polling() {
            return;
        }
        delay = Some(cmd.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, command};

    fn make(api: &Arc<FakeApi>, status: Status) -> Arc<CommandState> {
        let api: Arc<dyn JobApi> = api.clone();
        Arc::new(CommandState::new(
            api,
            "42",
            "9",
            &command(1, status),
            &PortalConfig::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_decodes_base64() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", false);
        let cmd = make(&api, Status::Success);

        assert!(cmd.is_loading());
        cmd.load();
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(cmd.logs().as_deref(), Some("hello"));
        assert!(!cmd.log_is_full());
        assert!(!cmd.is_loading());
        assert_eq!(cmd.load_state(), LoadState::Idle);
        assert_eq!(api.calls(), vec!["command_log 42 9 1 false".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_command_fetches_once() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", true);
        let cmd = make(&api, Status::Failure);

        cmd.load();
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(api.count("command_log"), 1);
        assert!(!cmd.is_polling());

        // Already fetched and not active: nothing to do
        cmd.load();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.count("command_log"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_command_polls_until_reset() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", false);
        let cmd = make(&api, Status::Ongoing);

        cmd.load();
        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(api.count("command_log"), 3);
        assert!(cmd.is_polling());

        cmd.reset();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.count("command_log"), 3);
        assert!(!cmd.is_polling());
        assert_eq!(cmd.logs().as_deref(), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_stops_when_status_settles() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", false);
        let cmd = make(&api, Status::Pending);

        cmd.load();
        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(api.count("command_log"), 2);

        cmd.refresh(&command(1, Status::Success));
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.count("command_log"), 2);
        assert!(!cmd.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_load_does_not_double_poll() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", false);
        let cmd = make(&api, Status::Ongoing);

        cmd.load();
        cmd.load();
        time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(api.count("command_log"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quest_full_fetches_immediately() {
        let api = Arc::new(FakeApi::default());
        api.set_log("ZnVsbCBsb2c=", true);
        let cmd = make(&api, Status::Success);

        cmd.quest_full().await;

        assert!(cmd.log_full());
        assert!(cmd.log_is_full());
        assert_eq!(cmd.logs().as_deref(), Some("full log"));
        assert_eq!(api.calls(), vec!["command_log 42 9 1 true".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quest_full_on_active_command_fetches_once_per_interval() {
        let api = Arc::new(FakeApi::default());
        api.set_log("ZnVsbCBsb2c=", true);
        let cmd = make(&api, Status::Ongoing);

        cmd.quest_full().await;
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.calls(), vec!["command_log 42 9 1 true".to_string()]);
        assert!(cmd.is_polling());

        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(api.count("command_log"), 2);

        cmd.reset();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(api.count("command_log"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_keeps_polling_active_command() {
        let api = Arc::new(FakeApi::default());
        let cmd = make(&api, Status::Ongoing);

        cmd.load();
        time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(api.count("command_log"), 2);
        assert!(cmd.load_state().is_failed());
        assert!(cmd.is_loading());

        api.set_log("aGk=", false);
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cmd.logs().as_deref(), Some("hi"));
        assert_eq!(cmd.load_state(), LoadState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_command_ends_polling() {
        let api = Arc::new(FakeApi::default());
        api.set_log("aGVsbG8=", false);
        let cmd = make(&api, Status::Ongoing);

        cmd.load();
        time::sleep(Duration::from_millis(1500)).await;
        drop(cmd);
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(api.count("command_log"), 2);
    }

    #[test]
    fn test_alias_is_shortened() {
        let api: Arc<dyn JobApi> = Arc::new(FakeApi::default());
        let mut record = command(0, Status::NotStart);
        record.alias = "Compile all the assets".to_string();

        let cmd = CommandState::new(api, "42", "9", &record, &PortalConfig::default());
        assert_eq!(cmd.alias(), "Compile all th...");
    }
}
