// CLI module for oxitag
//
// Only compiled into the binary; the library never depends on it.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::run;
pub use config::Config;
