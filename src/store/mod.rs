//! Durable reading log backed by SQLite.
//!
//! # Data Flow
//! ```text
//! async caller (handler)
//!     → LogStore::execute (boxed task over mpsc)
//!     → store worker thread (owns the rusqlite::Connection)
//!     → transaction per mutation, commit
//!     → result back over oneshot
//! ```
//!
//! # Design Decisions
//! - One connection, one worker thread: operations are serialized
//! - Every create/delete is a single transaction
//! - Listing order is `date_time DESC, id DESC`
//! - Ids come from `AUTOINCREMENT` and are never reused

pub mod error;
pub mod reading;
mod schema;

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;

pub use error::{StoreError, StoreResult};
pub use reading::Reading;

use reading::{encode_timestamp, READING_COLUMNS};

type StoreTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum StoreCommand {
    Execute(StoreTask),
    Shutdown,
}

struct StoreInner {
    sender: mpsc::Sender<StoreCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl StoreInner {
    /// Stop the worker after queued tasks drain. Safe to call more than once.
    fn shutdown(&self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if self.sender.send(StoreCommand::Shutdown).is_err() {
                tracing::warn!("Store worker already gone before shutdown");
            }
            if handle.join().is_err() {
                tracing::error!("Store worker panicked");
            }
        }
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Handle to the reading log. Cheap to clone; all clones share one worker.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<StoreInner>,
    location: Arc<String>,
}

impl LogStore {
    /// Open (or create) the database file at `path`.
    ///
    /// Missing parent directories and the reading table are created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let location = path.display().to_string();
        Self::spawn(location, move || {
            let conn = Connection::open(&path)?;
            if let Err(err) =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            {
                tracing::warn!(error = %err, "Failed to enable WAL mode");
            }
            Ok(conn)
        })
    }

    /// Open a private in-memory store. Contents vanish on close.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::spawn(":memory:".to_string(), || Ok(Connection::open_in_memory()?))
    }

    fn spawn<F>(location: String, connect: F) -> StoreResult<Self>
    where
        F: FnOnce() -> StoreResult<Connection> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<StoreCommand>();
        let (ready_tx, ready_rx) = mpsc::channel::<StoreResult<()>>();

        let worker = thread::Builder::new()
            .name("blood-sugar-store".into())
            .spawn(move || {
                let mut conn = match connect().and_then(|conn| {
                    schema::ensure_schema(&conn)?;
                    Ok(conn)
                }) {
                    Ok(conn) => conn,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                if ready_tx.send(Ok(())).is_err() {
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        StoreCommand::Execute(task) => task(&mut conn),
                        StoreCommand::Shutdown => break,
                    }
                }

                tracing::debug!("Store worker exiting");
            })?;

        ready_rx.recv().map_err(|_| StoreError::Closed)??;

        tracing::info!(location = %location, "Log store opened");

        Ok(Self {
            inner: Arc::new(StoreInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            location: Arc::new(location),
        })
    }

    /// Where the data lives (file path or `:memory:`).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Stop the worker and close the connection.
    ///
    /// Blocks until queued operations finish. Later calls on any clone
    /// return [`StoreError::Closed`].
    pub fn close(&self) {
        self.inner.shutdown();
        tracing::info!(location = %self.location, "Log store closed");
    }

    /// Run `task` on the worker thread and await its result.
    async fn execute<F, T>(&self, task: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = StoreCommand::Execute(Box::new(move |conn| {
            let _ = reply_tx.send(task(conn));
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|_| StoreError::Closed)?;

        reply_rx.await.map_err(|_| StoreError::Closed)?
    }

    /// Record a reading taken now.
    pub async fn create(&self, blood_sugar: f64, meal_type: Option<String>) -> StoreResult<Reading> {
        self.create_at(blood_sugar, meal_type, Utc::now()).await
    }

    /// Record a reading with an explicit timestamp.
    pub async fn create_at(
        &self,
        blood_sugar: f64,
        meal_type: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> StoreResult<Reading> {
        let stamp = encode_timestamp(&recorded_at);
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO blood_sugar_log (date_time, blood_sugar, meal_type) VALUES (?1, ?2, ?3)",
                params![stamp, blood_sugar, meal_type],
            )?;
            let id = tx.last_insert_rowid();
            let reading = select_one(&tx, id)?
                .ok_or_else(|| StoreError::Corrupt(format!("reading {id} missing after insert")))?;
            tx.commit()?;
            Ok(reading)
        })
        .await
    }

    /// All readings, newest first. Equal timestamps list higher ids first.
    pub async fn list_all(&self) -> StoreResult<Vec<Reading>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {READING_COLUMNS} FROM blood_sugar_log ORDER BY date_time DESC, id DESC"
            ))?;
            let mut rows = stmt.query([])?;
            let mut readings = Vec::new();
            while let Some(row) = rows.next()? {
                readings.push(Reading::from_row(row)?);
            }
            Ok(readings)
        })
        .await
    }

    /// Look up a single reading.
    pub async fn get(&self, id: i64) -> StoreResult<Option<Reading>> {
        self.execute(move |conn| select_one(conn, id)).await
    }

    /// Remove a reading. Fails with [`StoreError::NotFound`] if `id` is absent.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM blood_sugar_log WHERE id = ?1", params![id])?;
            if removed == 0 {
                return Err(StoreError::NotFound(id));
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    /// Number of stored readings.
    pub async fn count(&self) -> StoreResult<usize> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM blood_sugar_log", [], |row| row.get(0))?;
            usize::try_from(count).map_err(|_| StoreError::Corrupt(format!("negative row count {count}")))
        })
        .await
    }
}

fn select_one(conn: &Connection, id: i64) -> StoreResult<Option<Reading>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {READING_COLUMNS} FROM blood_sugar_log WHERE id = ?1"
    ))?;
    let mut rows = stmt.query(params![id])?;
    let reading = match rows.next()? {
        Some(row) => Some(Reading::from_row(row)?),
        None => None,
    };
    Ok(reading)
}
