//! Append-only prediction history backed by SQLite.
//!
//! One row per completed prediction. Rows are never edited or removed here.
//! Symptom and precaution lists are stored joined with `LIST_SEPARATOR`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::{self, DatabaseError};

pub const LIST_SEPARATOR: &str = ", ";

/// Timestamp format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub name: String,
    pub gender: String,
    pub city: String,
    pub symptoms: String,
    pub predicted_disease: String,
    pub precautions: String,
    pub doctor: String,
    pub date: String,
}

impl NewHistoryRecord {
    /// Build a record stamped with the current local time.
    pub fn new_now(
        name: &str,
        gender: &str,
        city: &str,
        symptoms: &[String],
        predicted_disease: &str,
        precautions: &[String],
        doctor: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            gender: gender.to_string(),
            city: city.to_string(),
            symptoms: symptoms.join(LIST_SEPARATOR),
            predicted_disease: predicted_disease.to_string(),
            precautions: precautions.join(LIST_SEPARATOR),
            doctor: doctor.to_string(),
            date: Local::now().format(DATE_FORMAT).to_string(),
        }
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub city: String,
    pub symptoms: String,
    pub predicted_disease: String,
    pub precautions: String,
    pub doctor: String,
    pub date: String,
}

impl HistoryRecord {
    pub fn symptom_list(&self) -> Vec<String> {
        split_joined(&self.symptoms)
    }

    pub fn precaution_list(&self) -> Vec<String> {
        split_joined(&self.precautions)
    }
}

/// How often a disease has been predicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseCount {
    pub disease: String,
    pub count: i64,
}

/// Inverse of the join applied on write.
pub fn split_joined(joined: &str) -> Vec<String> {
    joined
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub trait HistoryStore: Send + Sync {
    /// Persist one record atomically and return its row id.
    fn append(&self, record: &NewHistoryRecord) -> Result<i64, DatabaseError>;

    /// All records, newest first.
    fn list_all(&self) -> Result<Vec<HistoryRecord>, DatabaseError>;

    /// Most frequent predictions, highest count first.
    fn top_diseases(&self, limit: usize) -> Result<Vec<DiseaseCount>, DatabaseError>;
}

/// `HistoryStore` over a single connection. The mutex serializes writers.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open (creating if absent) the history database at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "History store opened");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(db::open_memory_database()?))
    }

    /// Wrap a connection whose migrations have already run.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&self, record: &NewHistoryRecord) -> Result<i64, DatabaseError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO history (name, gender, city, symptoms, predicted_disease, precautions, doctor, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.name,
                record.gender,
                record.city,
                record.symptoms,
                record.predicted_disease,
                record.precautions,
                record.doctor,
                record.date,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<HistoryRecord>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, gender, city, symptoms, predicted_disease, precautions, doctor, date
             FROM history
             ORDER BY date DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(HistoryRecord {
                id: row.get(0)?,
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                gender: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                city: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                symptoms: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                predicted_disease: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                precautions: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                doctor: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                date: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }

    fn top_diseases(&self, limit: usize) -> Result<Vec<DiseaseCount>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT predicted_disease, COUNT(*) AS n
             FROM history
             WHERE predicted_disease IS NOT NULL AND predicted_disease != ''
             GROUP BY predicted_disease
             ORDER BY n DESC, predicted_disease ASC
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok(DiseaseCount {
                disease: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
    }
}
