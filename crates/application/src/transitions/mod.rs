//! Transitions Bounded Context - Application Layer
//!
//! Serializa y aplica los cambios de estado por tenant.

pub mod coordinator;

pub use coordinator::{TransitionCoordinator, TransitionOutcome};
