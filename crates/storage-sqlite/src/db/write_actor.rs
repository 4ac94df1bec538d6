//! Single-writer actor serializing all database mutations.
//!
//! SQLite allows one writer at a time; the actor owns a dedicated connection
//! and every submitted job runs inside its own immediate transaction. No
//! cross-job atomicity is provided.

use std::sync::Arc;

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use moneta_core::errors::{DatabaseError, Error, Result};

// Each job carries its own reply channel, so the queue needs no knowledge of
// return types.
type Job = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Job>,
}

impl WriteHandle {
    /// Run `job` in an immediate transaction on the writer's dedicated
    /// connection and await its result. An error return rolls the
    /// transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let wrapped: Job = Box::new(move |conn| {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);
            // Receiver may have been dropped (caller cancelled); that's fine.
            let _ = reply_tx.send(result);
        });

        self.tx.send(wrapped).await.map_err(|_| writer_stopped())?;
        reply_rx.await.map_err(|_| writer_stopped())?
    }
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "Database writer task is not running".to_string(),
    ))
}

/// Spawn the background writer task and return its handle.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Job>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer task could not obtain a connection: {}", e);
                return;
            }
        };

        while let Some(job) = rx.recv().await {
            job(&mut conn);
        }
    });

    WriteHandle { tx }
}
