//! Cron DTOs

use serde::{Deserialize, Serialize};

use crate::domain::cron::CronType;

/// One scheduled trigger attached to a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronEntry {
    #[serde(deserialize_with = "crate::dto::id_string")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CronType,
}
