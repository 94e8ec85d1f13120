//! STAKESET command line tooling
//!
//! Loads a committed staking set and a candidate block's pending changes
//! from JSON and answers staking-set queries against them.

pub mod commands;
pub mod files;

pub use commands::*;
pub use files::*;
