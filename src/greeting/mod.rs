//! Greeting capability: a closed set of greeters and the resolver that picks one from settings.

#[cfg(feature = "mock-greeting")]
mod mock;
mod resolver;

pub use resolver::GreeterResolver;

/// Interchangeable implementations of "generate a greeting for a name".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Greeter {
    Production,
    /// Deterministic development greeter; only compiled with the `mock-greeting` feature.
    #[cfg(feature = "mock-greeting")]
    Mock,
}

impl Greeter {
    /// `name` is used verbatim: no trimming, case changes, or validation.
    pub fn generate_greeting(&self, name: &str) -> String {
        match self {
            Greeter::Production => format!("Hello, {}", name),
            #[cfg(feature = "mock-greeting")]
            Greeter::Mock => mock::generate_greeting(name),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Greeter::Production => "production",
            #[cfg(feature = "mock-greeting")]
            Greeter::Mock => "mock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &["Alice", "", "  padded  ", "Zoë 世界", "a/b/c", "ALL CAPS"];

    #[test]
    fn production_is_byte_exact() {
        for name in NAMES {
            assert_eq!(Greeter::Production.generate_greeting(name), format!("Hello, {name}"));
        }
    }

    #[cfg(feature = "mock-greeting")]
    #[test]
    fn mock_is_byte_exact() {
        for name in NAMES {
            assert_eq!(Greeter::Mock.generate_greeting(name), format!("[mock] Hello, {name}"));
        }
    }
}
