//! Test-installed substitutes for normally resolved dependencies.
//!
//! Overrides live on the application context, so separate contexts never see each other's
//! entries. Within one context there is no per-caller isolation: tests sharing a context must
//! not install overrides concurrently.

use crate::db::SessionFactory;
use crate::error::AppError;
use crate::greeting::Greeter;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DependencyKey {
    Greeter,
    DatabaseSession,
}

impl DependencyKey {
    pub fn name(&self) -> &'static str {
        match self {
            DependencyKey::Greeter => "greeter",
            DependencyKey::DatabaseSession => "database session",
        }
    }

    fn accepts(&self, provider: &Provider) -> bool {
        matches!(
            (self, provider),
            (DependencyKey::Greeter, Provider::Greeter(_)) | (DependencyKey::DatabaseSession, Provider::Sessions(_))
        )
    }

    fn expected(&self) -> &'static str {
        match self {
            DependencyKey::Greeter => "greeter",
            DependencyKey::DatabaseSession => "session factory",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Provider {
    Greeter(Greeter),
    /// Sessions come from this factory instead of the shared resource factory.
    Sessions(SessionFactory),
}

#[derive(Default)]
pub struct Overrides {
    entries: RwLock<HashMap<DependencyKey, Provider>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `provider` for `key`, returning the provider it replaced.
    pub fn set(&self, key: DependencyKey, provider: Provider) -> Result<Option<Provider>, AppError> {
        if !key.accepts(&provider) {
            return Err(AppError::OverrideMismatch {
                key: key.name(),
                expected: key.expected(),
            });
        }
        tracing::debug!(key = key.name(), "override installed");
        Ok(self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, provider))
    }

    pub fn clear(&self, key: DependencyKey) -> Option<Provider> {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        if removed.is_some() {
            tracing::debug!(key = key.name(), "override removed");
        }
        removed
    }

    pub fn get(&self, key: DependencyKey) -> Option<Provider> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn greeter(&self) -> Option<Greeter> {
        match self.get(DependencyKey::Greeter)? {
            Provider::Greeter(greeter) => Some(greeter),
            Provider::Sessions(_) => None,
        }
    }

    pub fn sessions(&self) -> Option<SessionFactory> {
        match self.get(DependencyKey::DatabaseSession)? {
            Provider::Sessions(factory) => Some(factory),
            Provider::Greeter(_) => None,
        }
    }

    /// Installs an override that is removed when the returned guard is dropped.
    pub fn scoped(self: &Arc<Self>, key: DependencyKey, provider: Provider) -> Result<OverrideGuard, AppError> {
        self.set(key, provider)?;
        Ok(OverrideGuard {
            overrides: self.clone(),
            key,
        })
    }
}

#[must_use = "the override is removed as soon as the guard is dropped"]
pub struct OverrideGuard {
    overrides: Arc<Overrides>,
    key: DependencyKey,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        self.overrides.clear(self.key);
    }
}
