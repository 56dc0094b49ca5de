//! Publish configuration.

use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Default template directory, relative to the working directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "root-template";

/// Default entry-point file name inside the template directory.
pub const DEFAULT_ENTRY_POINT: &str = "index.html";

/// Default token replaced by the published bundle name.
pub const DEFAULT_PLACEHOLDER: &str = "{{main.js}}";

/// Default output directory name inside the environment root.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "www-root";

/// Default bundle file name inside the environment root.
pub const DEFAULT_BUNDLE: &str = "bundle.js";

/// How non-entry-point template files are named in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePolicy {
    /// Published as `<fingerprint><extension>`.
    #[default]
    Hashed,
    /// Published under their original file name.
    Verbatim,
}

/// Everything `publish` needs to know besides the environment root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub template_dir: PathBuf,
    pub entry_point_name: String,
    pub placeholder_token: String,
    pub output_subdir: String,
    pub bundle_name: String,
    pub template_policy: TemplatePolicy,
    /// Also resolve `{{<template file name>}}` tokens in the entry point.
    pub rewrite_asset_placeholders: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            entry_point_name: DEFAULT_ENTRY_POINT.to_string(),
            placeholder_token: DEFAULT_PLACEHOLDER.to_string(),
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            bundle_name: DEFAULT_BUNDLE.to_string(),
            template_policy: TemplatePolicy::Hashed,
            rewrite_asset_placeholders: true,
        }
    }
}

impl PublishConfig {
    /// Check that the configuration can drive a publish run.
    ///
    /// The entry point, bundle and output directory must each be a single
    /// plain file name so the run never reads or writes outside the
    /// directories it was pointed at.
    pub fn validate(&self) -> Result<()> {
        if self.placeholder_token.is_empty() {
            return Err(Error::invalid_config("placeholder token cannot be empty"));
        }

        for (label, name) in [
            ("entry point name", &self.entry_point_name),
            ("bundle name", &self.bundle_name),
            ("output subdirectory", &self.output_subdir),
        ] {
            if !is_plain_name(name) {
                return Err(Error::invalid_config(format!(
                    "{} must be a single file name, got {:?}",
                    label, name
                )));
            }
        }

        if self.output_subdir == self.bundle_name {
            return Err(Error::invalid_config(format!(
                "output subdirectory {:?} would replace the bundle",
                self.output_subdir
            )));
        }

        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
