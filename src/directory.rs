//! Snapshot of every tracked zone.
//!
//! The refresher owns the only mutable [`ZoneDirectory`]; everyone else sees
//! clones published through a [`DirectoryWatch`]. Zones are shared behind
//! `Arc`, so cloning a directory never copies zone data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use zonewatch_types::{Zone, ZoneKey};

/// Whether the last applied fetch of a zone succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    Fresh,
    Unavailable,
}

/// What the directory knows about one tracked zone.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEntry {
    /// Latest successfully fetched detail.
    Fresh(Arc<Zone>),
    /// The last fetch failed; no detail is shown until one succeeds.
    Unavailable { reason: String },
}

impl ZoneEntry {
    pub fn zone(&self) -> Option<&Zone> {
        match self {
            ZoneEntry::Fresh(zone) => Some(zone),
            ZoneEntry::Unavailable { .. } => None,
        }
    }

    pub fn freshness(&self) -> Freshness {
        match self {
            ZoneEntry::Fresh(_) => Freshness::Fresh,
            ZoneEntry::Unavailable { .. } => Freshness::Unavailable,
        }
    }
}

/// Tracked zones keyed by identity, in key order.
///
/// A tracked zone whose first fetch has not completed yet has no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneDirectory {
    entries: BTreeMap<ZoneKey, ZoneEntry>,
    updated_at: Option<DateTime<Utc>>,
}

impl ZoneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &ZoneKey) -> Option<&ZoneEntry> {
        self.entries.get(key)
    }

    /// Latest fresh detail of a zone.
    pub fn zone(&self, key: &ZoneKey) -> Option<&Zone> {
        self.entries.get(key).and_then(ZoneEntry::zone)
    }

    pub fn freshness(&self, key: &ZoneKey) -> Option<Freshness> {
        self.entries.get(key).map(ZoneEntry::freshness)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ZoneKey, &ZoneEntry)> {
        self.entries.iter()
    }

    /// Fresh zones only.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.entries.values().filter_map(ZoneEntry::zone)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ZoneKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unavailable_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.freshness() == Freshness::Unavailable)
            .count()
    }

    /// Time of the last change to any entry.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub(crate) fn replace(&mut self, zone: Zone) {
        self.entries
            .insert(zone.key.clone(), ZoneEntry::Fresh(Arc::new(zone)));
        self.touch();
    }

    pub(crate) fn mark_unavailable(&mut self, key: ZoneKey, reason: impl Into<String>) {
        self.entries.insert(
            key,
            ZoneEntry::Unavailable {
                reason: reason.into(),
            },
        );
        self.touch();
    }

    pub(crate) fn remove(&mut self, key: &ZoneKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Receiving side of the directory snapshots published by a running refresher.
///
/// Every snapshot is complete; a reader never observes a partially applied
/// update.
#[derive(Debug, Clone)]
pub struct DirectoryWatch {
    receiver: watch::Receiver<ZoneDirectory>,
}

impl DirectoryWatch {
    pub(crate) fn new(receiver: watch::Receiver<ZoneDirectory>) -> Self {
        Self { receiver }
    }

    /// The most recent snapshot.
    pub fn current(&self) -> ZoneDirectory {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the refresher has stopped and no further snapshot
    /// will arrive.
    pub async fn changed(&mut self) -> Option<ZoneDirectory> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
