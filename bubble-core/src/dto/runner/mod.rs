//! Runner DTOs
//!
//! One page of a job's runner history, as listed by the master.

use serde::{Deserialize, Serialize};

use crate::domain::status::Status;

/// A page of runners for one job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerPage {
    /// Zero-based page index echoed back by the master
    #[serde(default)]
    pub index: usize,
    /// Runners on this page, newest order as the master sorts them
    #[serde(default)]
    pub runners: Vec<RunnerRecord>,
    /// Total number of runners the job has
    pub total: usize,
    /// Page size used by the master
    pub perpage: usize,
}

/// One execution attempt of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerRecord {
    #[serde(deserialize_with = "crate::dto::id_string")]
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub cmds: Vec<CommandRecord>,
}

/// One command step within a runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecord {
    pub index: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alias: String,
    pub status: Status,
    /// Performance measurement, opaque to the client
    #[serde(default)]
    pub measure: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_page() {
        let json = r#"{
            "index": 0,
            "total": 1,
            "perpage": 20,
            "runners": [{
                "id": "1f",
                "status": 2,
                "cmds": [{"index": 0, "name": "build", "alias": "Build", "status": 2, "measure": 17}]
            }]
        }"#;
        let page: RunnerPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.perpage, 20);
        assert_eq!(page.runners[0].id, "1f");
        assert_eq!(page.runners[0].status, Status::Ongoing);
        assert_eq!(page.runners[0].cmds[0].measure, 17);
    }

    #[test]
    fn test_numeric_runner_id() {
        let record: RunnerRecord =
            serde_json::from_str(r#"{"id": 9, "status": 1, "cmds": []}"#).unwrap();
        assert_eq!(record.id, "9");
        assert_eq!(record.status, Status::Success);
    }
}
