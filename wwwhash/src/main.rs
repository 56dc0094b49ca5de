mod output;

use anyhow::{Context, Result};
use clap::Parser;
use output::{OutputWriter, PublishOutput};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wwwhash_core::{
    DEFAULT_BUNDLE, DEFAULT_ENTRY_POINT, DEFAULT_OUTPUT_SUBDIR, DEFAULT_PLACEHOLDER,
    DEFAULT_TEMPLATE_DIR, PublishConfig, Publisher, TemplatePolicy,
};

/// wwwhash - publish static web assets under content-derived names
#[derive(Parser, Debug)]
#[command(name = "wwwhash")]
#[command(
    about = "Copy a build's bundle and static templates into a cache-friendly web root",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Environment root holding the built bundle
    #[arg(default_value = "dist")]
    env_root: PathBuf,

    /// Directory of static template files, including the entry point
    #[arg(long, env = "WWWHASH_TEMPLATE_DIR", default_value = DEFAULT_TEMPLATE_DIR)]
    template_dir: PathBuf,

    /// Entry-point file name inside the template directory
    #[arg(long, default_value = DEFAULT_ENTRY_POINT)]
    entry_point: String,

    /// Token in the entry point replaced by the published bundle name
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// Output directory name inside the environment root
    #[arg(long, default_value = DEFAULT_OUTPUT_SUBDIR)]
    output_subdir: String,

    /// Bundle file name inside the environment root
    #[arg(long, default_value = DEFAULT_BUNDLE)]
    bundle: String,

    /// Publish template files under their original names
    #[arg(long)]
    verbatim_templates: bool,

    /// Leave `{{<file name>}}` tokens in the entry point untouched
    #[arg(long)]
    no_asset_placeholders: bool,

    /// Print the publish report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            template_dir: self.template_dir.clone(),
            entry_point_name: self.entry_point.clone(),
            placeholder_token: self.placeholder.clone(),
            output_subdir: self.output_subdir.clone(),
            bundle_name: self.bundle.clone(),
            template_policy: if self.verbatim_templates {
                TemplatePolicy::Verbatim
            } else {
                TemplatePolicy::Hashed
            },
            rewrite_asset_placeholders: !self.no_asset_placeholders,
        }
    }
}

/// Initialize tracing on stderr with the given verbosity.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(log_filter(verbose, rust_log.as_deref()))
        .init();
}

/// A valid, non-empty `RUST_LOG` wins; otherwise `-v` picks the level.
fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    match rust_log.filter(|s| !s.is_empty()).map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        _ => EnvFilter::default().add_directive(level.into()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = OutputWriter::new(cli.json);

    match cmd_publish(&cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.write_error(&err, 1);
            ExitCode::FAILURE
        }
    }
}

fn cmd_publish(cli: &Cli, output: &OutputWriter) -> Result<()> {
    let publisher =
        Publisher::new(cli.publish_config()).with_context(|| "Invalid publish options")?;

    let report = publisher
        .publish(&cli.env_root)
        .with_context(|| publish_failure(&cli.env_root))?;

    let data = PublishOutput::from(report);
    output.write(io::stdout().lock(), &data, || data.to_text())?;

    Ok(())
}

fn publish_failure(env_root: &Path) -> String {
    format!("Failed to publish {}", env_root.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsString;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_core() {
        let cli = Cli::try_parse_from(["wwwhash"]).unwrap();
        assert_eq!(cli.env_root, PathBuf::from("dist"));

        // WWWHASH_TEMPLATE_DIR may be set in the environment running the tests
        let config = PublishConfig {
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            ..cli.publish_config()
        };
        assert_eq!(config, PublishConfig::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "wwwhash",
            "build",
            "--template-dir",
            "static",
            "--entry-point",
            "app.html",
            "--placeholder",
            "@@JS@@",
            "--output-subdir",
            "public",
            "--bundle",
            "main.mjs",
            "--verbatim-templates",
            "--no-asset-placeholders",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.env_root, PathBuf::from("build"));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);

        let config = cli.publish_config();
        assert_eq!(config.template_dir, PathBuf::from("static"));
        assert_eq!(config.entry_point_name, "app.html");
        assert_eq!(config.placeholder_token, "@@JS@@");
        assert_eq!(config.output_subdir, "public");
        assert_eq!(config.bundle_name, "main.mjs");
        assert_eq!(config.template_policy, TemplatePolicy::Verbatim);
        assert!(!config.rewrite_asset_placeholders);
    }

    #[test]
    fn test_log_filter_from_verbosity() {
        assert_eq!(log_filter(0, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(2, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(1, Some("")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_level_not_overridden() {
        assert_eq!(
            log_filter(0, Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(3, Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn test_publish_failure_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let cli = Cli::try_parse_from([
            OsString::from("wwwhash"),
            temp.path().as_os_str().to_owned(),
            OsString::from("--template-dir"),
            temp.path().join("absent").into_os_string(),
        ])
        .unwrap();

        let err = cmd_publish(&cli, &OutputWriter::new(false)).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("Failed to publish"));
        assert!(message.contains("Missing bundle"));
    }
}
