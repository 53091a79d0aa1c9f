//! officebot Resolve
//!
//! Resolution of infobox text into knowledge-base claims.
//!
//! # Core Concepts
//!
//! - [`Collaborators`]: explicit context bundling the page source, link
//!   resolver, entity lookups and committer
//! - [`PositionResolver`]: ordered rule table turning a job title into a
//!   position-held claim
//! - [`QualifierResolver`]: dates, predecessors, districts and friends
//! - [`RecordResolver`]: a whole position record at once
//! - [`Lexicon`]: data tables (countries, remaps, district overrides)
//! - [`CachedLinkResolver`]: moka-backed memoization of link lookups
//!
//! # Example
//!
//! ```rust
//! use officebot_resolve::{synthetic_district_title, Lexicon};
//!
//! let lexicon = Lexicon::builtin().unwrap();
//! assert_eq!(lexicon.countries.len(), 4);
//! assert_eq!(synthetic_district_title("Osca"), "Circumscripció electoral d'Osca");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cache;
mod collab;
mod district;
mod error;
mod lexicon;
mod organization;
mod position;
mod qualifier;
mod record;

pub use cache::{CacheStats, CachedLinkResolver};
pub use collab::{
    Collaborators, CommitError, CommitReceipt, Committer, EntityLookup, EntityProperties,
    LinkResolver, PageSource, SiteConfig, SiteId, StatementEdit, WikiPage,
};
pub use district::{synthetic_district_title, DistrictRef, DistrictResolver};
pub use error::{LexiconError, ResolveError, ResolveResult};
pub use lexicon::{AmbassadorEntry, Lexicon};
pub use organization::{organization_from_list_title, HeadOf, ListWord, OrganizationLookup};
pub use position::{PositionResolver, ResolvedPosition};
pub use qualifier::{QualifierOutcome, QualifierResolver, SkipReason};
pub use record::{RecordResolver, ResolvedRecord, SkippedQualifier};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
