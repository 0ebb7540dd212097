//! Mock greeter for local development and tests.

const MARKER: &str = "[mock]";

pub(super) fn generate_greeting(name: &str) -> String {
    format!("{} Hello, {}", MARKER, name)
}
