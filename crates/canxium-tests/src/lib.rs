//! # canxium-tests
//!
//! Integration tests for the Canxium cross-mining verifier.
//!
//! The [`fixtures`] module carries Kaspa blocks with real kHeavyHash
//! solutions, mined offline against low-difficulty targets, so the
//! end-to-end scenarios exercise the full proof-of-work path.

pub mod fixtures;




pub use fixtures::*;
