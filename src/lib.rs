// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod error;
pub mod round;
pub mod runtime;
pub mod session;
pub mod stats;

pub use error::GameError;
