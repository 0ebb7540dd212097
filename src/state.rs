//! Application context shared by all routes. Built once at startup and passed to the router.

use crate::config::SettingsStore;
use crate::db::{run_scoped, run_transaction, ResourceFactory, Session, SessionFuture};
use crate::error::{AppError, ConfigError};
use crate::greeting::{Greeter, GreeterResolver};
use crate::overrides::Overrides;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    /// Pool and session factory, built on first use.
    pub db: Arc<ResourceFactory>,
    pub greeters: Arc<GreeterResolver>,
    pub overrides: Arc<Overrides>,
}

impl AppState {
    pub fn new(settings: SettingsStore) -> Self {
        let settings = Arc::new(settings);
        AppState {
            db: Arc::new(ResourceFactory::new(settings.clone())),
            settings,
            greeters: Arc::new(GreeterResolver::new()),
            overrides: Arc::new(Overrides::new()),
        }
    }

    /// Context over the process environment and `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(SettingsStore::from_env()?))
    }

    /// Overridden greeter if one is installed, otherwise the resolver's choice.
    pub fn greeter(&self) -> Result<Greeter, AppError> {
        if let Some(greeter) = self.overrides.greeter() {
            return Ok(greeter);
        }
        let settings = self.settings.app()?;
        self.greeters.resolve(&settings)
    }

    /// Session from the overridden factory if one is installed, otherwise from the shared pool.
    pub fn new_session(&self) -> Result<Session, AppError> {
        match self.overrides.sessions() {
            Some(factory) => Ok(factory.session()),
            None => self.db.new_session(),
        }
    }

    pub async fn scoped_session<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
    {
        run_scoped(self.new_session()?, f).await
    }

    pub async fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> SessionFuture<'s, T>,
    {
        run_transaction(self.new_session()?, f).await
    }
}
