//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the player, the catalog scan
//! and logging, plus helpers to locate and load them.

mod load;
mod schema;

pub use load::default_log_dir;
pub use schema::*;
