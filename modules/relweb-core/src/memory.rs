//! In-process collaborators: a record store and a notice collector.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use relweb_common::{Notice, NoticeKind, StoreKind};
use serde_json::Value;

use crate::seed;
use crate::traits::{Notifier, RecordStore};

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Table-per-kind JSON store held in memory.
///
/// Backs offline runs of the site and the tests. Writes can be made to fail
/// on demand to exercise rollback paths.
pub struct MemoryStore {
    tables: Mutex<HashMap<StoreKind, Vec<Value>>>,
    fail_all_writes: AtomicBool,
    fail_next_writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            fail_all_writes: AtomicBool::new(false),
            fail_next_writes: AtomicUsize::new(0),
        }
    }

    /// A store whose `stories` table holds the launch stories.
    pub fn seeded() -> Self {
        let rows = seed::default_stories()
            .iter()
            .filter_map(|s| serde_json::to_value(s).ok())
            .collect();
        Self::new().with_rows(StoreKind::Stories, rows)
    }

    pub fn with_rows(self, kind: StoreKind, rows: Vec<Value>) -> Self {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind, rows);
        self
    }

    /// Make every subsequent write fail until switched back off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_all_writes.store(fail, Ordering::SeqCst);
    }

    /// Make the next `n` writes fail.
    pub fn fail_next_writes(&self, n: usize) {
        self.fail_next_writes.store(n, Ordering::SeqCst);
    }

    /// Current rows of a table (for assertions).
    pub fn rows(&self, kind: StoreKind) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_all_writes.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        let consumed = self
            .fail_next_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            bail!("write rejected");
        }
        Ok(())
    }
}

fn id_matches(row: &Value, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self, kind: StoreKind) -> Result<Vec<Value>> {
        Ok(self.rows(kind))
    }

    async fn update_field(&self, kind: StoreKind, id: &str, field: &str, value: Value) -> Result<()> {
        self.check_write()?;

        let mut tables = self
            .tables
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        let row = tables
            .get_mut(&kind)
            .and_then(|rows| rows.iter_mut().find(|row| id_matches(row, id)))
            .ok_or_else(|| anyhow!("no {kind} row with id {id}"))?;

        match row.as_object_mut() {
            Some(obj) => {
                obj.insert(field.to_string(), value);
                Ok(())
            }
            None => bail!("{kind} row {id} is not an object"),
        }
    }

    async fn insert(&self, kind: StoreKind, row: Value) -> Result<()> {
        self.check_write()?;

        self.tables
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?
            .entry(kind)
            .or_default()
            .push(row);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NoticeBuffer
// ---------------------------------------------------------------------------

/// Collects notices raised while handling one request so they can be handed
/// back to the page.
#[derive(Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drain everything collected so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl Notifier for NoticeBuffer {
    fn notify(&self, kind: NoticeKind, message: &str) {
        let notice = match kind {
            NoticeKind::Success => Notice::success(message),
            NoticeKind::Error => Notice::error(message),
        };
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice);
    }
}
