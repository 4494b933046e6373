mod args;
mod config;
pub mod logging;

pub use args::{Args, USAGE};
pub use config::{Config, Panel};
