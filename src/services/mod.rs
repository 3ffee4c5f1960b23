//! Services
//!
//! Logic that spans more than one store operation.

pub mod engagement;

pub use engagement::{EngagementService, FavoriteOutcome};
