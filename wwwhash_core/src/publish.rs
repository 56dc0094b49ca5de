//! Publishing an environment's bundle and templates into the output directory.

use crate::config::{PublishConfig, TemplatePolicy};
use crate::error::{Error, Result};
use crate::hash::{Fingerprint, hashed_name};
use crate::manifest::{AssetMap, PublishReport, PublishedFile};
use crate::render::render_entry_point;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Prefix of the scratch directory created inside the environment root.
const STAGING_PREFIX: &str = ".wwwhash-";

/// Validated input locations for one run.
#[derive(Debug)]
struct Inputs {
    bundle: PathBuf,
    template_dir: PathBuf,
    entry_point: PathBuf,
}

/// Publishes a built environment into a content-addressed output directory.
#[derive(Debug, Clone)]
pub struct Publisher {
    config: PublishConfig,
}

impl Publisher {
    /// Create a publisher, rejecting unusable configuration.
    pub fn new(config: PublishConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration this publisher runs with.
    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Get the output directory for an environment root.
    pub fn output_dir(&self, env_root: &Path) -> PathBuf {
        env_root.join(&self.config.output_subdir)
    }

    /// Publish `env_root`, replacing its output directory.
    ///
    /// The new output is built in a scratch directory next to the old one
    /// and renamed into place once complete. Any failure before that point
    /// leaves the previous output untouched.
    pub fn publish(&self, env_root: &Path) -> Result<PublishReport> {
        let span = info_span!("publish", env = %env_root.display());
        let _guard = span.enter();

        let inputs = self.check_inputs(env_root)?;
        let output_dir = self.output_dir(env_root);

        info!(
            template_dir = %inputs.template_dir.display(),
            output = %output_dir.display(),
            "publishing"
        );

        let scratch = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(env_root)?;
        let staged = scratch.path().join("next");
        fs::create_dir(&staged)?;

        let bundle = self.publish_bundle(&inputs.bundle, &staged)?;
        let assets = self.publish_templates(&inputs, &staged)?;
        let replacements =
            self.publish_entry_point(&inputs.entry_point, &bundle, &assets, &staged)?;

        swap_into_place(&staged, &output_dir, scratch.path())?;

        // The previous output now lives in the scratch directory.
        if let Err(err) = scratch.close() {
            warn!(error = %err, "failed to remove previous output");
        }

        info!(
            bundle = %bundle.published,
            assets = assets.len(),
            replacements,
            "published"
        );

        Ok(PublishReport {
            output_dir,
            bundle,
            template_policy: self.config.template_policy,
            assets,
            entry_point: self.config.entry_point_name.clone(),
            replacements,
        })
    }

    /// Resolve input paths and verify they exist.
    fn check_inputs(&self, env_root: &Path) -> Result<Inputs> {
        let bundle = env_root.join(&self.config.bundle_name);
        if !bundle.is_file() {
            return Err(Error::missing_input("bundle", bundle));
        }

        let template_dir = self.config.template_dir.clone();
        if !template_dir.is_dir() {
            return Err(Error::missing_input("template directory", template_dir));
        }

        let entry_point = template_dir.join(&self.config.entry_point_name);
        if !entry_point.is_file() {
            return Err(Error::missing_input("entry point", entry_point));
        }

        self.check_template_outside_output(env_root, &template_dir)?;

        Ok(Inputs {
            bundle,
            template_dir,
            entry_point,
        })
    }

    /// Reject a template directory that the output swap would replace.
    fn check_template_outside_output(&self, env_root: &Path, template_dir: &Path) -> Result<()> {
        let output_dir = self.output_dir(env_root);
        let output_dir = match output_dir.canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                env_root.canonicalize()?.join(&self.config.output_subdir)
            }
            Err(err) => return Err(err.into()),
        };

        if template_dir.canonicalize()?.starts_with(&output_dir) {
            return Err(Error::invalid_config(format!(
                "template directory {} lies inside output directory {}",
                template_dir.display(),
                output_dir.display()
            )));
        }

        Ok(())
    }

    /// Copy the bundle under its fingerprinted name.
    fn publish_bundle(&self, bundle: &Path, staged: &Path) -> Result<PublishedFile> {
        let fingerprint = Fingerprint::of_file(bundle)?;
        let published = hashed_name(&fingerprint, &self.config.bundle_name);
        fs::copy(bundle, staged.join(&published))?;

        debug!(file = %self.config.bundle_name, published = %published, "copied bundle");

        Ok(PublishedFile {
            original: self.config.bundle_name.clone(),
            published,
            fingerprint,
        })
    }

    /// Copy every template file except the entry point.
    fn publish_templates(&self, inputs: &Inputs, staged: &Path) -> Result<AssetMap> {
        let mut assets = AssetMap::new();

        let walker = ignore::WalkBuilder::new(&inputs.template_dir)
            .max_depth(Some(1)) // Flat directory only
            .standard_filters(false) // Publish hidden and ignored files too
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }

            let path = entry.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::invalid_file_name(path))?;

            if name == self.config.entry_point_name {
                continue;
            }

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                warn!(path = %path.display(), "skipping non-file template entry");
                continue;
            }

            let published = match self.config.template_policy {
                TemplatePolicy::Hashed => hashed_name(&Fingerprint::of_file(path)?, name),
                TemplatePolicy::Verbatim => name.to_string(),
            };
            fs::copy(path, staged.join(&published))?;

            debug!(file = name, published = %published, "copied template file");
            assets.add(name, published);
        }

        Ok(assets)
    }

    /// Render the entry point under its original name.
    fn publish_entry_point(
        &self,
        entry_point: &Path,
        bundle: &PublishedFile,
        assets: &AssetMap,
        staged: &Path,
    ) -> Result<usize> {
        let bytes = fs::read(entry_point)?;
        let template = String::from_utf8(bytes).map_err(|e| Error::encoding(entry_point, e))?;

        let rendered = render_entry_point(
            &template,
            &self.config.placeholder_token,
            &bundle.published,
            self.config.rewrite_asset_placeholders.then_some(assets),
        );

        if rendered.replacements == 0 {
            warn!(
                entry_point = %entry_point.display(),
                token = %self.config.placeholder_token,
                "entry point contains no placeholders"
            );
        }

        fs::write(staged.join(&self.config.entry_point_name), rendered.content)?;
        Ok(rendered.replacements)
    }
}

/// Publish `env_root` with the given configuration.
pub fn publish(env_root: &Path, config: &PublishConfig) -> Result<PublishReport> {
    Publisher::new(config.clone())?.publish(env_root)
}

/// Move `staged` to `output`, parking any previous output under `scratch`.
///
/// If the final rename fails the previous output is moved back.
fn swap_into_place(staged: &Path, output: &Path, scratch: &Path) -> Result<()> {
    let previous = scratch.join("previous");

    let had_previous = match fs::symlink_metadata(output) {
        Ok(_) => {
            fs::rename(output, &previous)?;
            true
        }
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => return Err(err.into()),
    };

    if let Err(err) = fs::rename(staged, output) {
        if had_previous {
            if let Err(restore) = fs::rename(&previous, output) {
                warn!(error = %restore, "failed to restore previous output");
            }
        }
        return Err(err.into());
    }

    Ok(())
}
