//! Log DTOs

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Log output of one command step as returned by the master
///
/// `log` is base64 text. `full` tells whether the master returned the whole
/// log or only its tail, which may differ from what was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogChunk {
    pub log: String,
    #[serde(default)]
    pub full: bool,
}

impl LogChunk {
    /// Decodes the payload into display text
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn decode(&self) -> Result<String, base64::DecodeError> {
        let bytes = STANDARD.decode(self.log.trim())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
