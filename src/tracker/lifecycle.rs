//! Opening and persisting the curated collection and hash cache.
//!
//! Responsibilities:
//! - Load both files at batch start; missing or unreadable prior state is a
//!   cold start, not an error.
//! - Persist both files wholesale at commit through atomic replace, so the
//!   on-disk representation is never torn.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::constants::{CACHE_FILE, ITEMS_FILE};
use crate::detect::HashCache;
use crate::error::Result;
use crate::types::{ContentHash, CuratedRecord, RecordId};

/// Primary handle over one reconciliation batch.
///
/// Owns the in-memory curated collection (indexed by identifier) and the
/// hash cache for the lifetime of a run: `open` → `reconcile` → `commit`.
/// Two batches must not run concurrently against the same root; callers that
/// need that add an external single-writer lock around the whole run.
pub struct Tracker {
    root: PathBuf,
    pub(crate) records: BTreeMap<RecordId, CuratedRecord>,
    pub(crate) cache: HashCache,
    pub(crate) dirty: bool,
}

impl Tracker {
    /// Open the store rooted at `root`, loading prior state if present.
    ///
    /// An empty or absent store is a valid cold-start state. Unreadable or
    /// undecodable prior state also cold-starts, with a diagnostic, per the
    /// load-failure policy.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let items: Vec<CuratedRecord> = load_or_default(&root.join(ITEMS_FILE));
        let cache: HashCache = load_or_default(&root.join(CACHE_FILE));

        let mut records = BTreeMap::new();
        for mut record in items {
            if record.id.is_empty() {
                tracing::warn!(title = %record.title, "dropping stored record without an identifier");
                continue;
            }
            record.normalize();
            records.insert(record.id.clone(), record);
        }

        Ok(Self {
            root,
            records,
            cache,
            dirty: false,
        })
    }

    /// Persist the full collection and the rebuilt hash cache.
    ///
    /// Failure here is fatal for the batch: reporting success after a lost
    /// write would make the next run re-insert records it already merged.
    pub fn commit(&mut self) -> Result<()> {
        let items: Vec<&CuratedRecord> = self.records.values().collect();
        write_atomic(&self.root.join(ITEMS_FILE), &items)?;
        write_atomic(&self.root.join(CACHE_FILE), &self.cache)?;
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&CuratedRecord> {
        self.records.get(id)
    }

    /// Records in identifier order.
    pub fn records(&self) -> impl Iterator<Item = &CuratedRecord> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hash cached for an identity by the most recent reconcile.
    #[must_use]
    pub fn cached_hash(&self, id: &RecordId) -> Option<&ContentHash> {
        self.cache.get(id)
    }

    /// True when reconciled state has not been committed yet.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "prior state unreadable; cold-starting empty");
            return T::default();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "prior state undecodable; cold-starting empty");
            T::default()
        }
    }
}

fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = AtomicWriteFile::open(path)?;
    serde_json::to_writer_pretty(file.as_file_mut(), value)?;
    file.as_file_mut().write_all(b"\n")?;
    file.as_file_mut().sync_all()?;
    file.commit()?;
    Ok(())
}
