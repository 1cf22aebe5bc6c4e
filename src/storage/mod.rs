// src/storage/mod.rs
pub mod sqlite;

use crate::models::Publication;
use crate::utils::error::StorageError;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub use sqlite::SqliteStore;

/// Destination for extracted publications.
///
/// `upsert` creates or replaces the record with the same `identifier`, so
/// re-crawling unchanged rows leaves the store as it was. Implementations
/// are shared between page tasks and must handle their own locking.
pub trait RecordSink: Send + Sync {
    fn upsert(&self, publication: &Publication) -> Result<(), StorageError>;
}

/// Keeps records in memory, keyed by identifier.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Publication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.len())
    }

    /// All stored records, ordered by identifier.
    pub fn snapshot(&self) -> Result<Vec<Publication>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.values().cloned().collect())
    }
}

impl RecordSink for MemoryStore {
    fn upsert(&self, publication: &Publication) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        records.insert(publication.identifier.clone(), publication.clone());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::publication;
    use super::*;

    #[test]
    fn test_memory_upsert_replaces_by_identifier() {
        let store = MemoryStore::new();
        store.upsert(&publication("a", "Proiect")).unwrap();
        store.upsert(&publication("a", "Proiect")).unwrap();
        store.upsert(&publication("b", "Alt proiect")).unwrap();
        assert_eq!(store.len().unwrap(), 2);

        let mut changed = publication("a", "Proiect");
        changed.avizatori = "MJ".to_string();
        store.upsert(&changed).unwrap();

        let records = store.snapshot().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].avizatori, "MJ");
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.upsert(&publication("a", "Proiect")).unwrap();

        let holder = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _records = holder.records.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StorageError::LockPoisoned)));
        assert!(matches!(store.snapshot(), Err(StorageError::LockPoisoned)));
        assert!(matches!(
            store.upsert(&publication("b", "Alt")),
            Err(StorageError::LockPoisoned)
        ));
    }
}
