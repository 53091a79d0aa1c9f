//! officebot Model
//!
//! Value types shared by every stage of the position-held pipeline.
//!
//! # Core Concepts
//!
//! - [`EntityId`] / [`PropertyId`]: validated knowledge-base identifiers
//! - [`WikiDate`]: calendar date carrying its own [`Precision`]
//! - [`Claim`]: a (property, value) pair
//! - [`Statement`]: main claim + rank + [`Qualifiers`] + [`Source`]s
//! - [`ExistingStatement`]: a statement already stored on an entity
//!
//! # Example
//!
//! ```rust
//! use officebot_model::{props, Claim, EntityId, Statement, WikiDate};
//!
//! let statement = Statement::builder(Claim::entity(props::POSITION_HELD, EntityId::new(18_171_345)))
//!     .qualifier(Claim::time(props::START_TIME, WikiDate::year(1977)))
//!     .build();
//!
//! assert_eq!(statement.qualifiers().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod claim;
mod date;
mod error;
mod id;
mod statement;

pub use claim::{Claim, ClaimValue};
pub use date::{Precision, WikiDate};
pub use error::ModelError;
pub use id::{props, EntityId, PropertyId, StatementId};
pub use statement::{ExistingStatement, Qualifiers, Rank, Source, Statement, StatementBuilder};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
