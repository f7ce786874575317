//! `k90-profile`: compile a JSON key binding profile for a Corsair K90.
//!
//! # Usage
//!
//! ```text
//! k90-profile [OPTIONS] [PROFILE] [FILE]
//!
//! Arguments:
//!   [PROFILE]  Hardware profile slot 1-3 [default: device.default_profile]
//!   [FILE]     Profile document; reads stdin when omitted
//!
//! Options:
//!   --format <hex|json>  Output rendering [default: output.format]
//!   --out-dir <DIR>      Also write keys.bin, bindings.bin and data.bin
//!   --check              Validate and print a summary only
//!   --config <PATH>      Tool config file
//! ```
//!
//! `hex` prints the vendor requests an upload to `PROFILE` would send, in
//! order. `json` prints the validated bindings with every default filled in.
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                          |
//! |-------------------|--------------------------------------|
//! | `K90_FORMAT`      | Same as `--format`                   |
//! | `K90_OUT_DIR`     | Same as `--out-dir`                  |
//! | `K90_CONFIG`      | Same as `--config`                   |
//! | `RUST_LOG`        | Log filter, overrides `tool.log_level` |

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use k90_core::{build, upload_profile, KeyUsageTable, ProfileSlot};
use k90_profile::config::{self, ConfigError, OutputFormat, ToolConfig};
use k90_profile::dump::{self, HexDumpTransport};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Compiles a K90 key binding profile and shows what would be uploaded.
#[derive(Debug, Parser)]
#[command(
    name = "k90-profile",
    about = "Compile Corsair K90 key binding profiles",
    version
)]
struct Cli {
    /// Hardware profile slot (1-3) the upload targets.
    profile: Option<u8>,

    /// JSON profile document. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// How to render the compiled profile.
    #[arg(long, value_enum, env = "K90_FORMAT")]
    format: Option<OutputFormat>,

    /// Directory to write the raw keys/bindings/data buffers into.
    #[arg(long, env = "K90_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Validate the document and print a summary without encoding it.
    #[arg(long)]
    check: bool,

    /// Config file to use instead of the platform default.
    #[arg(long, env = "K90_CONFIG")]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loaded before the subscriber: it supplies the fallback log level.
    let loaded = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let (cfg, no_config_dir) = match loaded {
        Ok(cfg) => (cfg, false),
        Err(ConfigError::NoPlatformConfigDir) => (ToolConfig::default(), true),
        Err(e) => return Err(e).context("failed to load config"),
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.tool.log_level)),
        )
        .init();

    if no_config_dir {
        warn!("no platform config directory; using default settings");
    }

    run(cli, &cfg)
}

fn run(cli: Cli, cfg: &ToolConfig) -> anyhow::Result<()> {
    let slot_number = cli.profile.unwrap_or(cfg.device.default_profile);
    let slot = ProfileSlot::try_from(slot_number).context("invalid profile argument")?;
    let format = cli.format.unwrap_or(cfg.output.format);
    let out_dir = cli.out_dir.or_else(|| cfg.output.out_dir.clone());

    let document = read_document(cli.file.as_ref())?;
    let table = KeyUsageTable::standard();
    let profile = build(&document, table).context("invalid profile")?;

    if cli.check {
        print!("{}", dump::describe(&profile, table));
        return Ok(());
    }

    let data = profile.encode();
    info!(
        %slot,
        keys = data.keys.len(),
        bindings = data.bindings.len(),
        data = data.data.len(),
        "profile compiled"
    );

    if let Some(dir) = &out_dir {
        dump::write_buffers(&data, dir)
            .with_context(|| format!("failed to write buffers to {}", dir.display()))?;
    }

    match format {
        OutputFormat::Hex => {
            let mut transport = HexDumpTransport::new(io::stdout().lock());
            upload_profile(&mut transport, slot, &data).context("failed to write upload plan")?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&profile).context("failed to render profile")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Parses the profile document from `path`, or from stdin when `None`.
fn read_document(path: Option<&PathBuf>) -> anyhow::Result<Value> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            serde_json::from_str(&text).context("failed to parse stdin")
        }
    }
}
