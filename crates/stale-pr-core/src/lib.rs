//! Staleness classification and action decisions for pull requests
//!
//! Everything in this crate is pure: no network, no clock. The current
//! time is always passed in, so every decision can be replayed in tests.
//!
//! Data flows one PR at a time:
//!
//! ```text
//! PrObservation ──► PrFacts ──► Classification ──► Action
//!   (facts.rs)     (facts.rs)   (classifier.rs)   (resolver.rs)
//! ```
//!
//! State across runs lives only in the PR's comment trail, recognised via
//! the hidden markers in [`marker`].

pub mod classifier;
pub mod facts;
pub mod marker;
pub mod messages;
pub mod resolver;

pub use classifier::{classify, Classification, StaleReason, StaleVerdict, StalenessPolicy};
pub use facts::{MemberPolicy, PrFacts, PrObservation, WarningRecord};
pub use marker::Marker;
pub use messages::Messages;
pub use resolver::{resolve, Action};
