//! # selfhosted-pages
//!
//! Turns a directory of YAML records describing software projects, their
//! categories and platforms into a tree of cross-linked markdown pages, ready
//! for a static site builder such as Sphinx with MyST.
//!
//! ## Quick Start
//!
//! ```no_run
//! use selfhosted_pages::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .source_dir("./awesome-selfhosted-data")
//!     .output_dir("./site")
//!     .exclude_license("⊘ Proprietary")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Data flows one way, nothing reads back what another stage wrote:
//! 1. **Loader**: reads categories, platforms, projects, licenses, header and footer
//! 2. **Record renderer**: one markdown fragment per project, with badges
//! 3. **Index assembler**: the root page listing every project
//! 4. **Collection pages**: one page per category and per platform
//! 5. **Writer**: lays the pages and the stylesheet out on disk
//!
//! ## Output layout
//!
//! ```text
//! <output>/pages/index.md
//! <output>/pages/categories/<slug>.md
//! <output>/pages/platforms/<slug>.md
//! <output>/assets/custom.css
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod filter;
mod index;
mod loader;
mod model;
mod page;
mod pipeline;
mod record;
mod template;
mod writer;

pub mod slug;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use filter::LicenseFilter;
pub use index::navigation_manifest;
pub use loader::{load_licenses, load_records, read_text, SortOrder, SourceLayout};
pub use model::{Category, LabelSet, License, Link, Named, Platform, Project};
pub use page::{ensure_unique_slugs, PageKind, PAGE_EXTENSION};
pub use pipeline::{Pipeline, PipelineStats};
pub use record::{ALERT_AGE_DAYS, WARNING_AGE_DAYS};
pub use writer::STYLESHEET_FILE;

/// Runs the complete generation pipeline with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - A required input (source directory, record directory, licenses, header, footer) is missing
/// - A record cannot be decoded
/// - Two labels share a slug
/// - Output files cannot be written
///
/// # Examples
///
/// ```no_run
/// use selfhosted_pages::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .source_dir("./data")
///     .output_dir("./site")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<PipelineStats> {
    Pipeline::new(config)?.run()
}
