use crate::cache::Cached;
use crate::config::AppSettings;
use crate::error::AppError;
use crate::greeting::Greeter;

/// Selects the greeter from settings once and caches the choice until [`GreeterResolver::clear`].
#[derive(Default)]
pub struct GreeterResolver {
    resolved: Cached<Greeter>,
}

impl GreeterResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, settings: &AppSettings) -> Result<Greeter, AppError> {
        self.resolved
            .get_or_try_init(|| {
                let greeter = select(settings)?;
                tracing::debug!(greeter = greeter.kind(), "greeter resolved");
                Ok(greeter)
            })
            .map(|greeter| *greeter)
    }

    /// Forces the next [`GreeterResolver::resolve`] to re-read the settings.
    pub fn clear(&self) {
        self.resolved.invalidate();
    }
}

fn select(settings: &AppSettings) -> Result<Greeter, AppError> {
    if settings.use_mock_greeting {
        mock_greeter()
    } else {
        Ok(Greeter::Production)
    }
}

#[cfg(feature = "mock-greeting")]
fn mock_greeter() -> Result<Greeter, AppError> {
    Ok(Greeter::Mock)
}

#[cfg(not(feature = "mock-greeting"))]
fn mock_greeter() -> Result<Greeter, AppError> {
    Err(AppError::DependencyUnavailable {
        dependency: "mock greeting service",
        hint: "rebuild with the `mock-greeting` feature enabled or unset GREETING_API_USE_MOCK_GREETING",
    })
}
