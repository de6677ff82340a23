//! In-memory implementation of every repository trait, used by the test suite.
//!
//! Rows are kept in insertion order. Sorting and updates go through the rows'
//! serde representation, whose field names are the column names.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::alumni_repository::{AlumniRepository, ALUMNI_SEARCH_COLUMNS};
use crate::db::connection::Probe;
use crate::db::file_repository::FileRepository;
use crate::db::models::{AlumniRow, FileRow, PekerjaanRow, RecordState, UserRow};
use crate::db::pekerjaan_repository::{PekerjaanFilter, PekerjaanRepository, PEKERJAAN_SEARCH_COLUMNS};
use crate::db::user_repository::UserRepository;
use crate::listing::{ListQuery, SortOrder, ID_COLUMN};
use crate::patch::UpdateSet;

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRow>>,
    alumni: Mutex<Vec<AlumniRow>>,
    pekerjaan: Mutex<Vec<PekerjaanRow>>,
    files: Mutex<Vec<FileRow>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails like an unreachable database
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    pub fn pekerjaan_snapshot(&self) -> Vec<PekerjaanRow> {
        self.pekerjaan.lock().unwrap().clone()
    }
}

fn to_object<T: Serialize>(row: &T) -> serde_json::Map<String, Value> {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    }
}

fn apply<T: Serialize + DeserializeOwned>(row: &T, set: &UpdateSet) -> Result<T, sqlx::Error> {
    let mut map = to_object(row);
    for (column, value) in set.iter() {
        map.insert(column.to_string(), value.to_json());
    }
    serde_json::from_value(Value::Object(map)).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// PostgreSQL-like ordering: nulls sort after every value
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn matches_search(map: &serde_json::Map<String, Value>, columns: &[&str], search: Option<&str>) -> bool {
    let Some(search) = search else {
        return true;
    };
    let needle = search.to_lowercase();
    columns.iter().any(|column| {
        map.get(*column)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

fn filter_rows<T: Serialize + Clone>(rows: &[T], columns: &[&str], search: Option<&str>) -> Vec<(T, serde_json::Map<String, Value>)> {
    rows.iter()
        .map(|row| (row.clone(), to_object(row)))
        .filter(|(_, map)| matches_search(map, columns, search))
        .collect()
}

fn page<T: Serialize + Clone>(rows: &[T], columns: &[&str], query: &ListQuery) -> Vec<T> {
    let mut matched = filter_rows(rows, columns, query.search.as_deref());
    matched.sort_by(|(_, a), (_, b)| {
        let primary = compare_values(a.get(query.sort_by), b.get(query.sort_by));
        let primary = match query.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| compare_values(a.get(ID_COLUMN), b.get(ID_COLUMN)))
    });
    matched
        .into_iter()
        .skip(query.offset() as usize)
        .take(query.limit as usize)
        .map(|(row, _)| row)
        .collect()
}

#[async_trait]
impl Probe for MemoryStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username_or_email(&self, login: &str) -> Result<Option<UserRow>, sqlx::Error> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        self.check()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: &UserRow) -> Result<UserRow, sqlx::Error> {
        self.check()?;
        self.users.lock().unwrap().push(user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl AlumniRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error> {
        self.check()?;
        Ok(self.alumni.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AlumniRow>, sqlx::Error> {
        self.check()?;
        Ok(self
            .alumni
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn list_by_jurusan(&self, jurusan: &str) -> Result<Vec<AlumniRow>, sqlx::Error> {
        self.check()?;
        let mut rows: Vec<AlumniRow> = self
            .alumni
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.jurusan == jurusan)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.nama.cmp(&b.nama).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_paged(&self, query: &ListQuery) -> Result<Vec<AlumniRow>, sqlx::Error> {
        self.check()?;
        Ok(page(&self.alumni.lock().unwrap(), ALUMNI_SEARCH_COLUMNS, query))
    }

    async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        self.check()?;
        Ok(filter_rows(&self.alumni.lock().unwrap(), ALUMNI_SEARCH_COLUMNS, search).len() as i64)
    }

    async fn insert(&self, alumni: &AlumniRow) -> Result<AlumniRow, sqlx::Error> {
        self.check()?;
        self.alumni.lock().unwrap().push(alumni.clone());
        Ok(alumni.clone())
    }

    async fn update_one(&self, id: Uuid, set: &UpdateSet) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.alumni.lock().unwrap();
        match rows.iter_mut().find(|a| a.id == id) {
            Some(row) => {
                *row = apply(row, set)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.alumni.lock().unwrap();
        let before = rows.len();
        rows.retain(|a| a.id != id);
        let removed = (before - rows.len()) as u64;
        if removed > 0 {
            self.pekerjaan.lock().unwrap().retain(|p| p.alumni_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl PekerjaanRepository for MemoryStore {
    async fn find_one(&self, filter: &PekerjaanFilter) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.check()?;
        Ok(self
            .pekerjaan
            .lock()
            .unwrap()
            .iter()
            .find(|p| filter.matches(p))
            .cloned())
    }

    async fn list_by_alumni(&self, alumni_id: Uuid) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        self.check()?;
        let mut rows: Vec<PekerjaanRow> = self
            .pekerjaan
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.alumni_id == alumni_id && !p.is_deleted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.tanggal_mulai_kerja
                .cmp(&a.tanggal_mulai_kerja)
                .then(a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn list_paged(&self, state: RecordState, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        self.check()?;
        let rows: Vec<PekerjaanRow> = self
            .pekerjaan
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.state() == state)
            .cloned()
            .collect();
        Ok(page(&rows, PEKERJAAN_SEARCH_COLUMNS, query))
    }

    async fn count(&self, state: RecordState, search: Option<&str>) -> Result<i64, sqlx::Error> {
        self.check()?;
        let rows: Vec<PekerjaanRow> = self
            .pekerjaan
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.state() == state)
            .cloned()
            .collect();
        Ok(filter_rows(&rows, PEKERJAAN_SEARCH_COLUMNS, search).len() as i64)
    }

    async fn insert(&self, job: &PekerjaanRow) -> Result<PekerjaanRow, sqlx::Error> {
        self.check()?;
        self.pekerjaan.lock().unwrap().push(job.clone());
        Ok(job.clone())
    }

    async fn update_one(&self, filter: &PekerjaanFilter, set: &UpdateSet) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.pekerjaan.lock().unwrap();
        match rows.iter_mut().find(|p| filter.matches(p)) {
            Some(row) => {
                *row = apply(row, set)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, filter: &PekerjaanFilter) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.pekerjaan.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !filter.matches(p));
        Ok((before - rows.len()) as u64)
    }
}

#[async_trait]
impl FileRepository for MemoryStore {
    async fn insert(&self, file: &FileRow) -> Result<FileRow, sqlx::Error> {
        self.check()?;
        self.files.lock().unwrap().push(file.clone());
        Ok(file.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRow>, sqlx::Error> {
        self.check()?;
        Ok(self.files.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }

    async fn list(&self, owner: Option<Uuid>) -> Result<Vec<FileRow>, sqlx::Error> {
        self.check()?;
        let mut rows: Vec<FileRow> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| owner.map_or(true, |o| f.owner_user_id == o))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.files.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| f.id != id);
        Ok((before - rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nulls_sort_last_and_timestamps_compare_as_instants() {
        let null = Value::Null;
        let a = json!("2024-01-01T00:00:00Z");
        let b = json!("2024-01-01T01:00:00+00:00");
        assert_eq!(compare_values(Some(&null), Some(&a)), Ordering::Greater);
        assert_eq!(compare_values(None, Some(&a)), Ordering::Greater);
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Less);
        assert_eq!(compare_values(Some(&json!(3)), Some(&json!(10))), Ordering::Less);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let map = to_object(&json!({"lokasi_kerja": "Jakarta Selatan", "gaji_range": null}));
        assert!(matches_search(&map, &["lokasi_kerja"], Some("jakarta")));
        assert!(!matches_search(&map, &["gaji_range"], Some("jakarta")));
        assert!(matches_search(&map, &["gaji_range"], None));
    }
}
