//! deepfreeze CLI - freeze a JSON document and print the immutable result.
//!
//! ```text
//! deepfreeze [--config PATH] [--compact] [FILE]
//! ```
//!
//! Reads `FILE` (or stdin when absent or `-`), imports it onto a fresh heap, freezes it with the
//! options from `~/.deepfreeze/config.toml`, and writes the frozen value as JSON to stdout.
//! Logs go to stderr; `RUST_LOG` overrides the `[log] filter` setting.

use anyhow::{Context, Result, bail};
use std::{
    env, fs,
    io::{self, Read, Write},
    path::PathBuf,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use deepfreeze_config::{ConfigError, DeepfreezeConfig};
use deepfreeze_core::{FreezeOptions, Freezer, Frozen, Heap};

const USAGE: &str = "usage: deepfreeze [--config PATH] [--compact] [FILE]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    compact: bool,
    input: Option<PathBuf>,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--compact" => parsed.compact = true,
                "--config" => {
                    let Some(path) = args.next() else {
                        bail!("--config requires a path\n{USAGE}");
                    };
                    parsed.config = Some(PathBuf::from(path));
                }
                "-" => parsed.input = None,
                flag if flag.starts_with('-') => bail!("unknown option `{flag}`\n{USAGE}"),
                path => {
                    if parsed.input.is_some() {
                        bail!("more than one input file given\n{USAGE}");
                    }
                    parsed.input = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }
}

fn init_tracing(config: Option<&DeepfreezeConfig>) {
    let fallback = config
        .and_then(DeepfreezeConfig::log_filter)
        .unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

/// Resolved config plus any error from the default location.
///
/// An explicit `--config` must load. A broken default file is not fatal: the freeze runs with
/// defaults and the error is logged once tracing is up.
#[derive(Debug, Default)]
struct LoadedConfig {
    config: Option<DeepfreezeConfig>,
    deferred: Option<ConfigError>,
}

fn load_config(explicit: Option<&PathBuf>, default: Option<PathBuf>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = DeepfreezeConfig::load_from(path)?;
        if config.is_none() {
            bail!("config file {} does not exist", path.display());
        }
        return Ok(LoadedConfig {
            config,
            deferred: None,
        });
    }

    let Some(path) = default else {
        return Ok(LoadedConfig::default());
    };
    Ok(match DeepfreezeConfig::load_from(&path) {
        Ok(config) => LoadedConfig {
            config,
            deferred: None,
        },
        Err(err) => LoadedConfig {
            config: None,
            deferred: Some(err),
        },
    })
}

fn report_config_error(err: &ConfigError) {
    tracing::warn!(
        path = %err.path().display(),
        error = %err,
        "Ignoring config file, using defaults"
    );
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn freeze_document(text: &str, options: FreezeOptions) -> Result<Frozen> {
    let document: serde_json::Value = serde_json::from_str(text).context("input is not JSON")?;
    let mut heap = Heap::new();
    let root = heap.import_json(&document);
    let frozen = Freezer::with_options(&heap, options).freeze(&root)?;
    Ok(frozen)
}

fn render(frozen: &Frozen, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(frozen)?
    } else {
        serde_json::to_string_pretty(frozen)?
    };
    Ok(text)
}

fn main() -> Result<()> {
    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let LoadedConfig { config, deferred } =
        load_config(args.config.as_ref(), DeepfreezeConfig::path())?;
    init_tracing(config.as_ref());
    if let Some(err) = &deferred {
        report_config_error(err);
    }

    let options = config
        .as_ref()
        .map(|config| FreezeOptions::from_config(&config.freeze_section()))
        .unwrap_or_default();
    tracing::debug!(
        prefix = %options.failure_prefix,
        max_depth = ?options.max_depth,
        "Resolved freeze options"
    );

    let text = read_input(args.input.as_ref())?;
    let frozen = freeze_document(&text, options)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render(&frozen, args.compact)?)?;
    Ok(())
}
