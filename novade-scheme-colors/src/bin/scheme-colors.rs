//! Command-line front end for inspecting color schemes.

use clap::{Parser, Subcommand};
use novade_scheme_colors::{
    init_logging_with_console, possible_scheme_file, scheme_name, Color, ColorSource, ConfigLoader, ConsoleTarget,
    SchemeColors, SchemeColorsConfig, SchemeColorsEvent, SchemeError, SchemePalette, WatcherConfig, XdgLocator,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::broadcast::error::RecvError;

/// Resolve color schemes and print the colors the NovaDE panel would use.
#[derive(Parser)]
#[command(name = "scheme-colors", about, version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (default: scheme-colors.toml in the NovaDE config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the palette of a scheme
    Show {
        /// Scheme name, absolute path to a .colors file, or "kdeglobals"
        scheme: String,
        /// Read window colors from the Plasma theme groups instead of [WM]
        #[arg(long)]
        plasma: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a palette synthesized from a single color
    Seed {
        /// "#rrggbb", "#rrggbbaa" or "r,g,b[,a]"
        color: String,
        /// Scheme providing the button colors
        #[arg(long)]
        fallback: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print the file a scheme resolves to
    Resolve {
        scheme: String,
    },
    /// Print the palette on every change of the scheme file until interrupted
    Watch {
        scheme: String,
        #[arg(long)]
        plasma: bool,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    scheme_name: String,
    scheme_file: Option<PathBuf>,
    source: ColorSource,
    colors: &'a SchemePalette,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("scheme-colors: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SchemeError> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    setup_logging(&config)?;

    let locator = XdgLocator::with_extra_data_dirs(config.paths.extra_data_dirs.clone());

    match cli.command {
        Command::Show { scheme, plasma, json } => {
            let colors = SchemeColors::with_watcher_config(&scheme, source(plasma), &locator, &disabled_watcher(&config));
            if colors.scheme_file().is_none() {
                return Err(SchemeError::InvalidInput(format!("no color scheme named {:?}", scheme)));
            }
            print_colors(&colors, json)
        }
        Command::Seed { color, fallback, json } => {
            let seed = parse_color(&color)?;
            let colors = SchemeColors::from_seed(seed, fallback.as_deref(), ColorSource::default(), &locator);
            print_colors(&colors, json)
        }
        Command::Resolve { scheme } => match possible_scheme_file(&scheme, &locator) {
            Some(file) => {
                println!("{}\t{}", scheme_name(&file), file.display());
                Ok(())
            }
            None => Err(SchemeError::InvalidInput(format!("no color scheme named {:?}", scheme))),
        },
        Command::Watch { scheme, plasma } => watch(&scheme, source(plasma), &locator, &config),
    }
}

/// Console logs go to stderr so they never mix with printed colors.
fn setup_logging(config: &SchemeColorsConfig) -> Result<(), SchemeError> {
    init_logging_with_console(&config.logging, false, ConsoleTarget::Stderr)
}

fn source(plasma: bool) -> ColorSource {
    if plasma {
        ColorSource::PlasmaTheme
    } else {
        ColorSource::WindowManager
    }
}

fn disabled_watcher(config: &SchemeColorsConfig) -> WatcherConfig {
    WatcherConfig {
        enabled: false,
        ..config.watcher.clone()
    }
}

fn parse_color(input: &str) -> Result<Color, SchemeError> {
    let parsed = if input.starts_with('#') {
        Color::from_hex(input)
    } else {
        Color::from_kconfig(input)
    };
    parsed.map_err(|e| SchemeError::InvalidInput(e.to_string()))
}

fn print_colors(colors: &SchemeColors, json: bool) -> Result<(), SchemeError> {
    let palette = colors.palette();
    if json {
        let report = Report {
            scheme_name: colors.scheme_name(),
            scheme_file: colors.scheme_file(),
            source: colors.color_source(),
            colors: &palette,
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| SchemeError::Internal(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    if let Some(file) = colors.scheme_file() {
        println!("# {} ({})", colors.scheme_name(), file.display());
    }
    print_palette(&palette);
    Ok(())
}

fn print_palette(palette: &SchemePalette) {
    for (name, color) in palette.entries() {
        match color {
            Some(c) => println!("{:<20} {:<10} {}", name, c.to_string(), c.to_kconfig()),
            None => println!("{:<20} -", name),
        }
    }
}

fn watch(
    scheme: &str,
    source: ColorSource,
    locator: &XdgLocator,
    config: &SchemeColorsConfig,
) -> Result<(), SchemeError> {
    let watcher_config = WatcherConfig {
        enabled: true,
        ..config.watcher.clone()
    };
    let colors = SchemeColors::with_watcher_config(scheme, source, locator, &watcher_config);
    let Some(file) = colors.scheme_file() else {
        return Err(SchemeError::InvalidInput(format!("no color scheme named {:?}", scheme)));
    };
    if !colors.is_watching() {
        return Err(SchemeError::Internal(format!("could not watch {}", file.display())));
    }

    let mut events = colors.subscribe();
    println!("# watching {} (Ctrl-C to stop)", file.display());
    print_palette(&colors.palette());

    loop {
        match events.blocking_recv() {
            Ok(SchemeColorsEvent::ColorsChanged(palette)) => {
                println!();
                println!("# reloaded {}", file.display());
                print_palette(&palette);
            }
            Ok(SchemeColorsEvent::SchemeFileChanged(_)) => {}
            Err(RecvError::Lagged(skipped)) => tracing::warn!("Skipped {} change notifications", skipped),
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}
