//! Worker monitor DTOs

use serde::{Deserialize, Serialize};

/// Load reported for one connected worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerLoad {
    #[serde(deserialize_with = "crate::dto::id_string")]
    pub id: String,
    pub workload: i64,
}
