#![forbid(unsafe_code)]

use crate::domain::PendingState;
use crate::error::Error;
use serde::{Deserialize, Serialize};

pub const STATE_SCHEMA_VERSION: u32 = 1;

/// On-disk form of [`PendingState`].
///
/// ```json
/// { "version": 1, "vms": { "<vm id>": { "<snapshot id>": "BUSY" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u32,
    pub vms: PendingState,
}

impl StateDocument {
    pub fn encode(state: &PendingState) -> Result<Vec<u8>, Error> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            version: u32,
            vms: &'a PendingState,
        }
        let mut bytes = serde_json::to_vec_pretty(&Borrowed {
            version: STATE_SCHEMA_VERSION,
            vms: state,
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<PendingState, Error> {
        let document: Self = serde_json::from_slice(bytes)?;
        if document.version != STATE_SCHEMA_VERSION {
            return Err(Error::UnsupportedStateVersion {
                found: document.version,
                expected: STATE_SCHEMA_VERSION,
            });
        }
        Ok(document.vms)
    }
}
