//! Logging abstractions for resolvers
//!
//! Resolvers never write to a global logger. Each one holds the sink it was
//! given, or a `NoOpLogger` when none was supplied.

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, LoggerExt, LogLevel, SharedLogger, BoxedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{MemoryLogger, LogEntry};
