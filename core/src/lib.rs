//! STAKESET Core Library
//!
//! Identifiers, the staker entity and its schedule order, and the traits
//! shared by the committed staking store and its diff overlays.

pub mod types;
pub mod staker;
pub mod iterator;
pub mod traits;
pub mod error;
pub mod config;

pub use types::*;
pub use staker::*;
pub use iterator::*;
pub use traits::*;
pub use error::*;
pub use config::*;
