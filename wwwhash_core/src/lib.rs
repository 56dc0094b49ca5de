//! # wwwhash Core
//!
//! Content-addressed publishing of static web assets using BLAKE3.
//!
//! A built environment directory holds a script bundle; a template directory
//! holds an HTML entry point and other static files. Publishing copies the
//! bundle and every template file into a fresh output directory under names
//! derived from their content, and writes the entry point with its
//! placeholders pointing at those names. Browsers can then cache everything
//! except the entry point indefinitely.
//!
//! ## Features
//!
//! - Stable, content-derived file names (`<blake3-hex><ext>`)
//! - `{{main.js}}` and `{{<file name>}}` placeholder resolution
//! - Output directory replaced with a rename, never half-deleted
//! - Explicit configuration with the conventional defaults
//!
//! ## Example
//!
//! ```no_run
//! use wwwhash_core::{PublishConfig, publish};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = publish(Path::new("dist"), &PublishConfig::default())?;
//! println!("bundle published as {}", report.bundle.published);
//!
//! for (original, published) in report.assets.iter() {
//!     println!("{} -> {}", original, published);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod hash;
mod manifest;
mod publish;
mod render;

pub use config::{
    DEFAULT_BUNDLE, DEFAULT_ENTRY_POINT, DEFAULT_OUTPUT_SUBDIR, DEFAULT_PLACEHOLDER,
    DEFAULT_TEMPLATE_DIR, PublishConfig, TemplatePolicy,
};
pub use error::{Error, Result};
pub use hash::{Fingerprint, extension_of, fingerprint, hashed_name};
pub use manifest::{AssetMap, PublishReport, PublishedFile};
pub use publish::{Publisher, publish};
pub use render::{Rendered, asset_token, render_entry_point};
