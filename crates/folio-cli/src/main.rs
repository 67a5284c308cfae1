//! Folio CLI - check site manifests and preview behavior headlessly.

use clap::{Parser, Subcommand};
use folio_core::{
    ConfigError, ManualScheduler, RecordingHost, Rect, SectionBounds, Site, SiteConfig, Size,
    UiSnapshot,
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type PreviewSite = Site<ManualScheduler, RecordingHost>;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site behavior: manifest checks and headless previews")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print UI snapshots as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a site manifest
    Check {
        /// Path to manifest file
        #[arg(default_value = "site.yaml")]
        manifest: PathBuf,
    },

    /// Write the default manifest
    Init {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Step the hero typewriter
    Typewriter {
        /// Manifest (built-in site when omitted)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(short, long, default_value = "40")]
        ticks: usize,
    },

    /// Run one theme reveal frame by frame
    Transition {
        /// Manifest (built-in site when omitted)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Viewport width
        #[arg(long, default_value = "1280")]
        width: f32,

        /// Viewport height
        #[arg(long, default_value = "720")]
        height: f32,

        /// Toggle center x (default: near the top-right corner)
        #[arg(long)]
        x: Option<f32>,

        /// Toggle center y
        #[arg(long, default_value = "36")]
        y: f32,

        /// Simulate an unmounted toggle control
        #[arg(long)]
        no_origin: bool,
    },

    /// Feed scroll offsets through a stacked layout
    Scroll {
        /// Manifest (built-in site when omitted)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Height of every section
        #[arg(long, default_value = "800")]
        section_height: f64,

        /// Scroll offsets, in order
        #[arg(required = true, allow_negative_numbers = true)]
        offsets: Vec<f64>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} already exists (use --force to overwrite)", .0.display())]
    Exists(PathBuf),

    #[error("manifest invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<String, CliError> {
    let json = cli.json;
    match cli.command {
        Commands::Check { manifest } => check_manifest(&manifest),
        Commands::Init { output, force } => init_manifest(output.as_deref(), force),
        Commands::Typewriter { manifest, ticks } => {
            typewriter(&load(manifest.as_deref())?, ticks, json)
        }
        Commands::Transition {
            manifest,
            width,
            height,
            x,
            y,
            no_origin,
        } => {
            let viewport = Size::new(width, height);
            let origin = (!no_origin).then(|| {
                let cx = x.unwrap_or(width - 40.0);
                Rect::new(cx - 20.0, y - 20.0, 40.0, 40.0)
            });
            transition(&load(manifest.as_deref())?, viewport, origin, json)
        }
        Commands::Scroll {
            manifest,
            section_height,
            offsets,
        } => scroll(&load(manifest.as_deref())?, section_height, &offsets, json),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load(manifest: Option<&Path>) -> Result<SiteConfig, CliError> {
    match manifest {
        Some(path) => {
            info!(path = %path.display(), "loading manifest");
            Ok(SiteConfig::from_yaml(&read(path)?)?)
        }
        None => Ok(SiteConfig::standard()),
    }
}

fn preview(config: &SiteConfig) -> Result<PreviewSite, CliError> {
    Ok(Site::new(config, ManualScheduler::new(), RecordingHost::new())?)
}

fn json_line(out: &mut String, snapshot: &UiSnapshot) -> Result<(), CliError> {
    out.push_str(&snapshot.to_json()?);
    out.push('\n');
    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

fn check_manifest(path: &Path) -> Result<String, CliError> {
    let config = SiteConfig::from_yaml(&read(path)?)?;
    Ok(summarize(path, &config))
}

fn summarize(path: &Path, config: &SiteConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Manifest valid: {}", path.display());
    let _ = writeln!(out, "  Phrases: {}", config.hero.phrases.len());
    let _ = writeln!(
        out,
        "  Typing: {}ms / deleting: {}ms",
        config.hero.typing_speed_ms, config.hero.deleting_speed_ms
    );
    let _ = writeln!(
        out,
        "  Sections: {} (default: {})",
        config.scroll.sections.len(),
        config.scroll.default_section
    );
    let _ = writeln!(out, "  Nav links: {}", config.nav.len());
    let _ = writeln!(
        out,
        "  Theme: {} (reveal {}ms + {}ms + {}ms)",
        config.theme.initial, config.theme.expand_ms, config.theme.hold_ms, config.theme.retract_ms
    );
    out
}

fn init_manifest(output: Option<&Path>, force: bool) -> Result<String, CliError> {
    let yaml = SiteConfig::standard().to_yaml()?;
    let Some(path) = output else {
        return Ok(yaml);
    };
    if path.exists() && !force {
        return Err(CliError::Exists(path.to_path_buf()));
    }
    fs::write(path, yaml).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!("Wrote {}\n", path.display()))
}

fn typewriter(config: &SiteConfig, ticks: usize, json: bool) -> Result<String, CliError> {
    let mut site = preview(config)?;
    site.start();

    let mut out = String::new();
    for _ in 0..ticks {
        let Some(fired) = site.scheduler_mut().pop_due(f64::INFINITY) else {
            break;
        };
        let at = fired.at;
        site.dispatch(fired);
        let snap = site.snapshot();
        if json {
            json_line(&mut out, &snap)?;
        } else {
            let cursor = if snap.is_deleting { '<' } else { '|' };
            let _ = writeln!(out, "{at:>8.0}ms  {}{cursor}", snap.typed_text);
        }
    }
    debug!(ticks, "typewriter preview done");
    Ok(out)
}

fn transition(
    config: &SiteConfig,
    viewport: Size,
    origin: Option<Rect>,
    json: bool,
) -> Result<String, CliError> {
    // typing is never started, so every delivery below belongs to the reveal
    let mut site = preview(config)?;
    let before = site.snapshot().theme;
    let outcome = site.request_theme_toggle(origin, viewport);

    let mut out = String::new();
    if !json {
        let _ = writeln!(out, "{before} -> {} ({outcome:?})", site.snapshot().theme);
    }
    while site.transition().is_animating() {
        let Some(fired) = site.scheduler_mut().pop_due(f64::INFINITY) else {
            break;
        };
        let at = fired.at;
        if !site.dispatch(fired) {
            continue;
        }
        let snap = site.snapshot();
        if json {
            json_line(&mut out, &snap)?;
        } else {
            let radius = snap
                .mask_radius
                .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
            let phase = format!("{:?}", snap.transition_phase);
            let _ = writeln!(out, "{at:>8.1}ms  {phase:<10} r={radius}");
        }
    }
    let blocked = site.host().input_blocked();
    if !json {
        let _ = writeln!(out, "input blocked at end: {blocked}");
    }
    Ok(out)
}

/// Sections stacked top to bottom, each `height` tall.
fn stacked_layout(
    sections: &[String],
    height: f64,
    scroll_y: f64,
) -> impl Fn(&str) -> Option<SectionBounds> + '_ {
    move |id| {
        let index = sections.iter().position(|s| s == id)?;
        let top = index as f64 * height - scroll_y;
        Some(SectionBounds::new(top, top + height))
    }
}

fn scroll(
    config: &SiteConfig,
    section_height: f64,
    offsets: &[f64],
    json: bool,
) -> Result<String, CliError> {
    let mut site = preview(config)?;
    let sections = site.scroll().config().sections.clone();

    let mut out = String::new();
    for &y in offsets {
        let layout = stacked_layout(&sections, section_height, y.max(0.0));
        site.scroll_sample(y, &layout);
        let snap = site.snapshot();
        if json {
            json_line(&mut out, &snap)?;
        } else {
            let _ = writeln!(
                out,
                "y={y:<8} active={:<14} header={:<5} top_button={}",
                snap.active_section, snap.header_visible, snap.show_scroll_top
            );
        }
    }
    Ok(out)
}
