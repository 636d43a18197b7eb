pub mod cli;
pub mod compose;
pub mod engine;
pub mod entity;
pub mod error;
pub mod generate;
pub mod server;
pub mod storage;

pub use entity::LogEntry;
pub use error::{Result, WeeklogError};
pub use storage::JsonStore;
