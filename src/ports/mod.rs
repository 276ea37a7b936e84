//! Ports layer: Trait definitions for the attack simulation seams.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the privacy evaluation and its pluggable parts (loss functions,
//! attacker models).

mod attacker;
mod loss;

pub use attacker::{AttackerError, AttackerKind, AttackerModel};
pub use loss::{LossError, LossFunction};
