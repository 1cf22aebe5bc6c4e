// src/storage/sqlite.rs
use super::RecordSink;
use crate::models::Publication;
use crate::utils::error::StorageError;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS publications (
        identifier             TEXT PRIMARY KEY,
        institution            TEXT NOT NULL,
        type                   TEXT NOT NULL,
        date                   TEXT,
        title                  TEXT NOT NULL,
        description            TEXT NOT NULL,
        documents              TEXT NOT NULL,
        contact                TEXT,
        feedback_days          INTEGER,
        max_feedback_date      TEXT,
        date_consultare        TEXT NOT NULL,
        date_procedura_avizare TEXT NOT NULL,
        avizatori              TEXT NOT NULL,
        date_termen_avize      TEXT NOT NULL,
        mfpmjmfe               TEXT NOT NULL,
        date_termen_reavizare  TEXT NOT NULL,
        initiator              TEXT NOT NULL,
        updated_at             TEXT NOT NULL DEFAULT (datetime('now'))
    );
";

const UPSERT: &str = "
    INSERT INTO publications (
        identifier, institution, type, date, title, description, documents,
        contact, feedback_days, max_feedback_date,
        date_consultare, date_procedura_avizare, avizatori, date_termen_avize,
        mfpmjmfe, date_termen_reavizare, initiator
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
    ON CONFLICT(identifier) DO UPDATE SET
        institution = excluded.institution,
        type = excluded.type,
        date = excluded.date,
        title = excluded.title,
        description = excluded.description,
        documents = excluded.documents,
        contact = excluded.contact,
        feedback_days = excluded.feedback_days,
        max_feedback_date = excluded.max_feedback_date,
        date_consultare = excluded.date_consultare,
        date_procedura_avizare = excluded.date_procedura_avizare,
        avizatori = excluded.avizatori,
        date_termen_avize = excluded.date_termen_avize,
        mfpmjmfe = excluded.mfpmjmfe,
        date_termen_reavizare = excluded.date_termen_reavizare,
        initiator = excluded.initiator,
        updated_at = datetime('now')
";

/// SQLite-backed store; one row per publication identifier.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::debug!("Opened SQLite store at {}", path.display());
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM publications", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    #[cfg(test)]
    pub fn get(&self, identifier: &str) -> Result<Option<Publication>, StorageError> {
        use crate::models::Document;
        use rusqlite::OptionalExtension;

        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        let row = conn
            .query_row(
                "SELECT identifier, institution, type, date, title, description, documents,
                        contact, feedback_days, max_feedback_date,
                        date_consultare, date_procedura_avizare, avizatori, date_termen_avize,
                        mfpmjmfe, date_termen_reavizare, initiator
                 FROM publications WHERE identifier = ?1",
                params![identifier],
                |row| {
                    Ok((
                        Publication {
                            identifier: row.get(0)?,
                            institution: row.get(1)?,
                            kind: row.get(2)?,
                            date: row.get(3)?,
                            title: row.get(4)?,
                            description: row.get(5)?,
                            documents: Vec::new(),
                            contact: row.get(7)?,
                            feedback_days: row.get(8)?,
                            max_feedback_date: row.get(9)?,
                            date_consultare: row.get(10)?,
                            date_procedura_avizare: row.get(11)?,
                            avizatori: row.get(12)?,
                            date_termen_avize: row.get(13)?,
                            mfpmjmfe: row.get(14)?,
                            date_termen_reavizare: row.get(15)?,
                            initiator: row.get(16)?,
                        },
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(mut publication, documents)| {
            publication.documents = serde_json::from_str::<Vec<Document>>(&documents)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok(publication)
        })
        .transpose()
    }
}

impl RecordSink for SqliteStore {
    fn upsert(&self, publication: &Publication) -> Result<(), StorageError> {
        let documents = publication
            .documents_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let conn = self.conn.lock().map_err(|_| StorageError::LockPoisoned)?;
        conn.prepare_cached(UPSERT)?.execute(params![
            publication.identifier,
            publication.institution,
            publication.kind,
            publication.date,
            publication.title,
            publication.description,
            documents,
            publication.contact,
            publication.feedback_days,
            publication.max_feedback_date,
            publication.date_consultare,
            publication.date_procedura_avizare,
            publication.avizatori,
            publication.date_termen_avize,
            publication.mfpmjmfe,
            publication.date_termen_reavizare,
            publication.initiator,
        ])?;

        tracing::trace!("Upserted {}", publication.identifier);
        Ok(())
    }
}
