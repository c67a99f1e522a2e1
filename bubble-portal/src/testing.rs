//! In-memory master used by the portal tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bubble_client::{ClientError, JobApi, Result};
use bubble_core::domain::cron::CronType;
use bubble_core::domain::status::Status;
use bubble_core::dto::cron::CronEntry;
use bubble_core::dto::log::LogChunk;
use bubble_core::dto::runner::{CommandRecord, RunnerPage, RunnerRecord};

use crate::lock;

/// Scripted master
///
/// Runner pages are served from a queue, optionally after a delay. Logs
/// repeat the last configured chunk. Every call is recorded.
#[derive(Default)]
pub struct FakeApi {
    pages: Mutex<VecDeque<(Duration, std::result::Result<RunnerPage, String>)>>,
    log: Mutex<Option<LogChunk>>,
    crons: Mutex<Vec<CronEntry>>,
    reject_writes: Mutex<bool>,
    next_id: Mutex<u64>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn push_page(&self, page: RunnerPage) {
        self.push_delayed(Duration::ZERO, page);
    }

    pub fn push_delayed(&self, delay: Duration, page: RunnerPage) {
        lock(&self.pages).push_back((delay, Ok(page)));
    }

    pub fn push_failure(&self, message: &str) {
        lock(&self.pages).push_back((Duration::ZERO, Err(message.to_string())));
    }

    pub fn set_log(&self, text_base64: &str, full: bool) {
        *lock(&self.log) = Some(LogChunk {
            log: text_base64.to_string(),
            full,
        });
    }

    pub fn set_crons(&self, crons: Vec<CronEntry>) {
        *lock(&self.crons) = crons;
    }

    pub fn reject_writes(&self) {
        *lock(&self.reject_writes) = true;
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }

    fn check_writes(&self) -> Result<()> {
        if *lock(&self.reject_writes) {
            Err(ClientError::rejected(-1, "rejected by fake"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobApi for FakeApi {
    async fn list_crons(&self, job: &str) -> Result<Vec<CronEntry>> {
        self.record(format!("list_crons {}", job));
        Ok(lock(&self.crons).clone())
    }

    async fn add_cron(&self, job: &str, kind: CronType) -> Result<CronEntry> {
        self.record(format!("add_cron {} {}", job, kind.code()));
        self.check_writes()?;

        let mut next = lock(&self.next_id);
        *next += 1;
        Ok(CronEntry {
            id: format!("{:x}", 0xa0 + *next),
            kind,
        })
    }

    async fn remove_cron(&self, job: &str, id: &str) -> Result<()> {
        self.record(format!("remove_cron {} {}", job, id));
        self.check_writes()
    }

    async fn list_runners(&self, job: &str, page: usize) -> Result<RunnerPage> {
        self.record(format!("list_runners {} {}", job, page));
        let next = lock(&self.pages).pop_front();

        match next {
            Some((delay, outcome)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome.map_err(|message| ClientError::rejected(-1, message))
            }
            None => Err(ClientError::rejected(-1, "no page queued")),
        }
    }

    async fn cancel_runner(&self, job: &str, runner: &str) -> Result<()> {
        self.record(format!("cancel_runner {} {}", job, runner));
        self.check_writes()
    }

    async fn command_log(
        &self,
        job: &str,
        runner: &str,
        step: usize,
        full: bool,
    ) -> Result<LogChunk> {
        self.record(format!("command_log {} {} {} {}", job, runner, step, full));
        lock(&self.log)
            .clone()
            .ok_or_else(|| ClientError::rejected(-1, "no log"))
    }
}

pub fn command(index: usize, status: Status) -> CommandRecord {
    CommandRecord {
        index,
        name: format!("step{}", index),
        alias: format!("Step {}", index),
        status,
        measure: 0,
    }
}

pub fn runner(id: &str, status: Status, steps: usize) -> RunnerRecord {
    RunnerRecord {
        id: id.to_string(),
        status,
        cmds: (0..steps).map(|i| command(i, status)).collect(),
    }
}

pub fn page(total: usize, perpage: usize, runners: Vec<RunnerRecord>) -> RunnerPage {
    RunnerPage {
        index: 0,
        runners,
        total,
        perpage,
    }
}
