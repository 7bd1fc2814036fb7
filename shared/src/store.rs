//! The ad book: every user's ad list, persisted as one JSON blob.
//!
//! Decode never fails. An absent or malformed blob, or one written by a
//! newer schema, yields an empty book; a pre-envelope blob (a bare
//! username-to-list object) is migrated in place. This is the documented
//! recovery policy, not an accident: the store is best-effort local state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ads::{AdId, AdRecord};

/// Version written into every encoded blob.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not serialize the ad book: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct StoredBook {
    version: u32,
    ads: BTreeMap<String, Vec<AdRecord>>,
}

#[derive(Serialize)]
struct StoredBookRef<'a> {
    version: u32,
    ads: &'a BTreeMap<String, Vec<AdRecord>>,
}

/// Username to ordered ad list, insertion order preserved per user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdBook {
    entries: BTreeMap<String, Vec<AdRecord>>,
}

impl AdBook {
    /// Decodes a stored blob under the empty-on-failure policy.
    #[must_use]
    pub fn decode(bytes: Option<&[u8]>) -> Self {
        let Some(bytes) = bytes else {
            return Self::default();
        };

        match serde_json::from_slice::<StoredBook>(bytes) {
            Ok(stored) if stored.version == SCHEMA_VERSION => Self {
                entries: stored.ads,
            },
            Ok(stored) => {
                warn!(
                    version = stored.version,
                    "ad book written by an unknown schema, starting empty"
                );
                Self::default()
            }
            Err(_) => match serde_json::from_slice::<BTreeMap<String, Vec<AdRecord>>>(bytes) {
                Ok(legacy) => {
                    debug!("migrating pre-envelope ad book");
                    Self { entries: legacy }
                }
                Err(err) => {
                    warn!(%err, "malformed ad book, starting empty");
                    Self::default()
                }
            },
        }
    }

    /// Encodes the current envelope. The write itself is a single blob set.
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let bytes = serde_json::to_vec(&StoredBookRef {
            version: SCHEMA_VERSION,
            ads: &self.entries,
        })?;
        Ok(bytes)
    }

    /// The user's ads in stored order; empty slice if the user has none.
    #[must_use]
    pub fn list_for(&self, username: &str) -> &[AdRecord] {
        self.entries.get(username).map_or(&[], Vec::as_slice)
    }

    /// Replaces the record with the same id in place, or appends.
    pub fn upsert(&mut self, username: &str, record: AdRecord) {
        let list = self.entries.entry(username.to_string()).or_default();
        match list.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => *slot = record,
            None => list.push(record),
        }
    }

    /// Removes the record with `id` from the user's list. Absent id is a
    /// no-op; the username key stays even when its list empties.
    pub fn remove(&mut self, username: &str, id: AdId) -> bool {
        let Some(list) = self.entries.get_mut(username) else {
            return false;
        };
        let before = list.len();
        list.retain(|record| record.id != id);
        before != list.len()
    }
}
