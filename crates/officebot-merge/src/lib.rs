//! officebot Merge
//!
//! Decides whether a new position statement is created, merged into an
//! existing one, or skipped.
//!
//! # Core Concepts
//!
//! - [`MergeEngine`]: the decision procedure
//! - [`MergeDecision`]: create / merge / skip
//! - [`MergePlan`]: replacement content plus the list of changes
//!
//! # Example
//!
//! ```rust
//! use officebot_merge::{MergeDecision, MergeEngine};
//! use officebot_model::{props, Claim, EntityId, Statement};
//!
//! let new = Statement::builder(Claim::entity(props::POSITION_HELD, EntityId::new(18_171_345))).build();
//! let decision = MergeEngine::default().decide(&new, &[]);
//! assert!(matches!(decision, MergeDecision::Create(_)));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod decision;
mod engine;

pub use decision::{MergeDecision, MergePlan, QualifierChange, SkipCause};
pub use engine::MergeEngine;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
