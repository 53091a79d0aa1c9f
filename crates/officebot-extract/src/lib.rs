//! officebot Extract
//!
//! Turns raw infobox markup into position records ready for resolution.
//!
//! # Core Concepts
//!
//! - [`TemplateFieldSet`]: ordered field → raw text map of one infobox
//! - [`group_positions`]: suffix grouping with title and year propagation
//! - [`DateParser`]: macro, link-chain and plain Catalan dates
//! - [`find_links`]: `[[target|text]]` scanning
//! - [`strip_transferred_fields`]: removes transferred fields from wikitext
//!
//! # Example
//!
//! ```rust
//! use officebot_extract::{group_positions, FieldRole, TemplateFieldSet};
//!
//! let fields = TemplateFieldSet::new()
//!     .with_field("carrec", "Alcalde de Vic")
//!     .with_field("inici", "1990")
//!     .with_field("inici2", "1995");
//!
//! let records = group_positions(&fields);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].title(), Some("Alcalde de Vic"));
//! assert_eq!(records[1].field(FieldRole::Start), Some("1995"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod date;
mod error;
mod fields;
mod grouper;
mod links;
mod strip;

pub use date::{is_macro, reversed_components, DateParser};
pub use error::{DateError, DateResult};
pub use fields::{
    is_recognized_root, pair_root, split_field_name, FieldRole, PairHalf, TemplateFieldSet,
    PAIR_LETTERS,
};
pub use grouper::{group_positions, LabelPair, PairWarning, PositionRecord};
pub use links::{find_links, strip_brackets, WikiLink};
pub use strip::strip_transferred_fields;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
