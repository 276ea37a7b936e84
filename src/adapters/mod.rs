//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the attack-simulation building blocks:
//! - `inverse_cdf`: percentile-space distance and cutoff kernel
//! - `hamming`: categorical key distance
//! - `radius_nn`: radius nearest neighbor attacker (numeric)
//! - `categorical_nn`: 1-NN attacker (categorical)

pub mod categorical_nn;
pub mod hamming;
pub mod inverse_cdf;
pub mod radius_nn;

pub use categorical_nn::CategoricalNearestNeighborAttacker;
pub use inverse_cdf::{CutoffKernelConfig, InverseCdfCutoff, InverseCdfDistance};
pub use radius_nn::RadiusNearestNeighborAttacker;
