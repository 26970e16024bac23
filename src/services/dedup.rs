//! Duplicate-image detection.
//!
//! Images are keyed by the SHA-256 of their base64 text, so identical bytes
//! collide no matter which source (URL, path, inline) delivered them. The
//! registry remembers every hash it has admitted for the lifetime of the
//! process; nothing is ever evicted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of base64 image content.
pub fn content_hash(base64_content: &str) -> String {
    hex::encode(Sha256::digest(base64_content.as_bytes()))
}

/// In-process registry of previously admitted image hashes.
///
/// Cloning is cheap and shares the underlying map, so every handle observes
/// the same history.
#[derive(Clone, Default)]
pub struct ImageRegistry {
    seen: Arc<DashMap<String, DateTime<Utc>>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a hash, or reports when it was first seen.
    ///
    /// Returns `None` for a new hash (now recorded with the current time) and
    /// the original timestamp for a repeat. The lookup and the insert are a
    /// single atomic step per hash, so two racing submissions of the same
    /// content admit exactly one.
    pub fn check_and_record(&self, hash: &str) -> Option<DateTime<Utc>> {
        match self.seen.entry(hash.to_string()) {
            Entry::Occupied(entry) => Some(*entry.get()),
            Entry::Vacant(entry) => {
                entry.insert(Utc::now());
                None
            }
        }
    }

    /// Number of distinct images admitted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
