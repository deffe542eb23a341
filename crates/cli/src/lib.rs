// Re-export command modules
pub mod commands;
mod execute;

pub use commands::{Commands, Encoding};
