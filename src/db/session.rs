//! Unit-of-work sessions handed out by a [`SessionFactory`].

use crate::error::AppError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Future returned by the closures passed to [`run_scoped`] and [`run_transaction`].
pub type SessionFuture<'s, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 's>>;

#[derive(Default, Debug)]
struct SessionCounters {
    opened: AtomicU64,
    closed: AtomicU64,
}

/// Produces sessions bound to one pool and tracks how many were opened and closed.
#[derive(Clone, Debug)]
pub struct SessionFactory {
    pool: PgPool,
    counters: Arc<SessionCounters>,
}

impl SessionFactory {
    pub fn new(pool: PgPool) -> Self {
        SessionFactory {
            pool,
            counters: Arc::new(SessionCounters::default()),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// New session; no connection is taken until the session is first used.
    pub fn session(&self) -> Session {
        let id = Uuid::new_v4();
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(session = %id, "session opened");
        Session {
            id,
            pool: self.pool.clone(),
            tx: None,
            closed: false,
            counters: self.counters.clone(),
        }
    }

    pub fn opened(&self) -> u64 {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> u64 {
        self.counters.closed.load(Ordering::SeqCst)
    }
}

/// Owned by exactly one caller. The transaction is begun lazily on first use and rolled back
/// unless committed. Dropping an open session closes it.
pub struct Session {
    id: Uuid,
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
    closed: bool,
    counters: Arc<SessionCounters>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("in_transaction", &self.tx.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Connection inside the session's transaction, beginning one if needed.
    pub async fn connection(&mut self) -> Result<&mut PgConnection, AppError> {
        if self.closed {
            return Err(AppError::SessionClosed(self.id));
        }
        if self.tx.is_none() {
            let tx = self.pool.begin().await?;
            tracing::debug!(session = %self.id, "transaction begun");
            self.tx = Some(tx);
        }
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(AppError::SessionClosed(self.id)),
        }
    }

    pub async fn commit(&mut self) -> Result<(), AppError> {
        if self.closed {
            return Err(AppError::SessionClosed(self.id));
        }
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::debug!(session = %self.id, "transaction committed");
        }
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<(), AppError> {
        if self.closed {
            return Err(AppError::SessionClosed(self.id));
        }
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            tracing::debug!(session = %self.id, "transaction rolled back");
        }
        Ok(())
    }

    /// Idempotent. An open transaction is dropped, which rolls it back and returns the connection.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.tx.take();
        self.closed = true;
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(session = %self.id, "session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Runs `f` with `session` and closes the session afterwards on every exit path.
pub async fn run_scoped<T, F>(mut session: Session, f: F) -> Result<T, AppError>
where
    F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
{
    let result = f(&mut session).await;
    session.close();
    result
}

/// Like [`run_scoped`], but commits when `f` succeeds and rolls back when it fails.
pub async fn run_transaction<T, F>(mut session: Session, f: F) -> Result<T, AppError>
where
    F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
{
    let result = match f(&mut session).await {
        Ok(value) => session.commit().await.map(|_| value),
        Err(e) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::warn!(session = %session.id(), error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    };
    session.close();
    result
}
