// Library surface for headless/integration tests and reuse.
// Terminal rendering lives with the binary in main.rs.
pub mod app_dirs;
pub mod config;
pub mod display;
pub mod error;
pub mod language;
pub mod runtime;
pub mod score;
pub mod session;
pub mod time_series;
pub mod word_generator;

pub use error::{Error, Result};
