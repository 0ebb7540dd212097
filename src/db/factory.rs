//! Lazily built, process-shared connection pool and session factory.
//!
//! The factory moves `Uninitialized -> Ready` at most once per reset. Concurrent first callers
//! serialize on the build lock; whoever gets it first constructs the pool, the rest observe the
//! stored handle. A failed build stores nothing, so the next caller retries.

use crate::config::SettingsStore;
use crate::db::session::{run_scoped, run_transaction, Session, SessionFactory, SessionFuture};
use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Pool plus the session factory bound to it.
#[derive(Debug)]
pub struct ResourceHandle {
    generation: u64,
    pool: PgPool,
    sessions: SessionFactory,
}

impl ResourceHandle {
    /// Build number of this handle, starting at 1. A reset followed by a rebuild yields a new number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn sessions(&self) -> &SessionFactory {
        &self.sessions
    }
}

enum FactoryState {
    Uninitialized,
    Ready(Arc<ResourceHandle>),
}

pub struct ResourceFactory {
    settings: Arc<SettingsStore>,
    state: RwLock<FactoryState>,
    build_lock: Mutex<()>,
    builds: AtomicU64,
}

impl ResourceFactory {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        ResourceFactory {
            settings,
            state: RwLock::new(FactoryState::Uninitialized),
            build_lock: Mutex::new(()),
            builds: AtomicU64::new(0),
        }
    }

    fn current(&self) -> Option<Arc<ResourceHandle>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            FactoryState::Ready(handle) => Some(handle.clone()),
            FactoryState::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Number of successful constructions since this factory was created.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::SeqCst)
    }

    /// Builds the pool on first call and returns the shared handle afterwards.
    /// Must run inside a Tokio runtime: the pool spawns its maintenance task on creation.
    pub fn ensure_ready(&self) -> Result<Arc<ResourceHandle>, AppError> {
        if let Some(handle) = self.current() {
            return Ok(handle);
        }
        let _building = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = self.current() {
            return Ok(handle);
        }
        let handle = Arc::new(self.build()?);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = FactoryState::Ready(handle.clone());
        Ok(handle)
    }

    fn build(&self) -> Result<ResourceHandle, AppError> {
        let settings = self.settings.db()?;
        if settings.max_connections == 0 {
            return Err(AppError::ResourceInitialization(
                "POSTGRES_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        let options = settings
            .connect_options()
            .map_err(|e| AppError::ResourceInitialization(format!("invalid database url: {}", e)))?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout())
            .test_before_acquire(true)
            .connect_lazy_with(options);
        let generation = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            generation,
            host = %settings.host,
            database = %settings.database,
            "database pool created"
        );
        Ok(ResourceHandle {
            generation,
            sessions: SessionFactory::new(pool.clone()),
            pool,
        })
    }

    /// Shared pool for schema tooling and other low-level access.
    pub fn pool(&self) -> Result<PgPool, AppError> {
        Ok(self.ensure_ready()?.pool.clone())
    }

    pub fn new_session(&self) -> Result<Session, AppError> {
        Ok(self.ensure_ready()?.sessions.session())
    }

    /// Runs `f` with a fresh session and closes it on every exit path. Nothing is committed.
    pub async fn scoped_session<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
    {
        run_scoped(self.new_session()?, f).await
    }

    /// Runs `f` in a fresh session, committing on success and rolling back on error.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
    {
        run_transaction(self.new_session()?, f).await
    }

    /// Drops the current handle and closes its pool. A no-op when nothing was built.
    pub async fn reset(&self) {
        let previous = {
            let _building = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(
                &mut *self.state.write().unwrap_or_else(PoisonError::into_inner),
                FactoryState::Uninitialized,
            )
        };
        if let FactoryState::Ready(handle) = previous {
            handle.pool.close().await;
            tracing::info!(generation = handle.generation, "database pool disposed");
        }
    }
}
