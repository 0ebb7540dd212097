//! Settings groups cached for the lifetime of the application context.

use crate::cache::Cached;
use crate::config::{AppSettings, DbSettings, EnvSource};
use crate::error::ConfigError;
use std::sync::{Arc, PoisonError, RwLock};

/// Owns the environment snapshot and the two independently cached settings groups.
/// Swapping the source does not clear the caches; call an `invalidate*` method to re-read.
pub struct SettingsStore {
    source: RwLock<EnvSource>,
    app: Cached<AppSettings>,
    db: Cached<DbSettings>,
}

impl SettingsStore {
    pub fn new(source: EnvSource) -> Self {
        SettingsStore {
            source: RwLock::new(source),
            app: Cached::new(),
            db: Cached::new(),
        }
    }

    /// Process environment layered over `.env` in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(EnvSource::from_process().with_env_file(".env")?))
    }

    pub fn source(&self) -> EnvSource {
        self.source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn replace_source(&self, source: EnvSource) {
        *self.source.write().unwrap_or_else(PoisonError::into_inner) = source;
    }

    pub fn app(&self) -> Result<Arc<AppSettings>, ConfigError> {
        self.app.get_or_try_init(|| AppSettings::from_source(&self.source()))
    }

    pub fn db(&self) -> Result<Arc<DbSettings>, ConfigError> {
        self.db.get_or_try_init(|| DbSettings::from_source(&self.source()))
    }

    pub fn invalidate_app(&self) {
        self.app.invalidate();
    }

    pub fn invalidate_db(&self) {
        self.db.invalidate();
    }

    pub fn invalidate(&self) {
        self.invalidate_app();
        self.invalidate_db();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_until_invalidated() {
        let store = SettingsStore::new(EnvSource::from_pairs([("APP_NAME", "first")]));
        let first = store.app().unwrap();
        assert_eq!(first.app_name, "first");

        store.replace_source(store.source().with_var("APP_NAME", "second"));
        assert!(Arc::ptr_eq(&first, &store.app().unwrap()));

        store.invalidate_app();
        assert_eq!(store.app().unwrap().app_name, "second");
    }

    #[test]
    fn groups_invalidate_independently() {
        let store = SettingsStore::new(EnvSource::from_pairs([("POSTGRES_HOST", "one")]));
        let db = store.db().unwrap();
        let app = store.app().unwrap();

        store.replace_source(EnvSource::from_pairs([("POSTGRES_HOST", "two")]));
        store.invalidate_app();
        assert!(!Arc::ptr_eq(&app, &store.app().unwrap()));
        assert_eq!(store.db().unwrap().host, db.host);

        store.invalidate_db();
        assert_eq!(store.db().unwrap().host, "two");
    }

    #[test]
    fn load_error_is_not_cached() {
        let store = SettingsStore::new(EnvSource::from_pairs([("APP_PORT", "x")]));
        assert!(store.app().is_err());
        store.replace_source(EnvSource::default());
        assert_eq!(store.app().unwrap().port, 8000);
    }
}
