pub mod greeter;
pub mod name;

pub use greeter::ResolvedGreeter;
pub use name::GreetingName;
