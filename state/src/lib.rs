//! STAKESET State Management
//!
//! The committed staking set ([`BaseStakers`]), uncommitted diff overlays
//! ([`DiffStakers`]) and the flattened read view composing them
//! ([`LayeredStakers`]).

pub mod base;
pub mod diff;
pub mod layered;

#[cfg(test)]
pub(crate) mod testing;

pub use base::*;
pub use diff::*;
pub use layered::*;
