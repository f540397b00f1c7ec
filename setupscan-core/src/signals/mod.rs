//! Signal classification over feature tables.
//!
//! The classifier is a pure function of one table: no state carries across
//! calls, so classifying the same table twice yields the same signal.

pub mod classifier;
pub mod stats;

pub use classifier::{classify, Classification, ClassifierParams, SqueezeClassifier, Trigger};
