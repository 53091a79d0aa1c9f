//! officebot Core
//!
//! Page-level orchestration of the position-held transfer:
//! - Reads a biography's infobox through the page source
//! - Resolves every position record, or none
//! - Merges the resulting statements into the entity's existing ones
//! - Commits in one call and optionally cleans the source page
//!
//! # Example
//!
//! ```rust
//! use officebot_core::{PageProcessor, PageStatus, TransferConfig};
//! use officebot_model::WikiDate;
//! use officebot_resolve::{SiteId, WikiPage};
//! use officebot_test_utils::sample_wiki;
//!
//! let wiki = sample_wiki();
//! let config = TransferConfig::new().with_dry_run(true);
//! let lexicon = config.load_lexicon().unwrap();
//! let processor = PageProcessor::new(wiki.collaborators(&config.sites), &lexicon, &config)
//!     .with_retrieved(WikiDate::ymd(2024, 5, 1).unwrap());
//!
//! let report = processor
//!     .process(&WikiPage::new(SiteId::new("ca"), "Joan Exemple"))
//!     .unwrap();
//! assert_eq!(report.status, PageStatus::DryRun);
//! assert_eq!(report.edits.len(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod processor;

pub use config::TransferConfig;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use processor::{PageFailure, PageProcessor, PageReport, PageStatus, RecordReport, RunSummary};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running the pipeline
    pub use crate::{PageProcessor, PageReport, PageStatus, PipelineError, TransferConfig};
    pub use officebot_resolve::{Collaborators, Lexicon, SiteConfig, SiteId, WikiPage};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
