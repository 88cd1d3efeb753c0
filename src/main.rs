// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! notescope: banknote authenticity analysis client
//!
//! Command-line front end over the notescope controller.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use notescope::analysis::AnalysisClient;
use notescope::config::AppConfig;
use notescope::controller::{Controller, StderrNotifier, Submission};
use notescope::intake::{media_type_for_path, PathChooser};
use notescope::render::ResultsPanel;
use notescope::report;
use notescope::state::UiState;
use notescope::theme::{JsonFileStore, ThemePreference};
use notescope::{NotescopeError, Result};

/// notescope CLI - banknote authenticity analysis client
#[derive(Parser, Debug)]
#[command(name = "notescope")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "0.1.0")]
#[command(about = "Submit banknote images for forensic authenticity analysis", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Analysis service URL (overrides config)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one image
    Analyze {
        /// Image to submit
        path: PathBuf,

        /// Declared media type (default: inferred from the extension)
        #[arg(long)]
        media_type: Option<String>,

        /// Result tab to show in the HTML report
        #[arg(short, long)]
        tab: Option<String>,

        /// Write the four visuals as JPEG files into this directory
        #[arg(long)]
        save_visuals: Option<PathBuf>,

        /// Write an HTML snapshot of the results screen
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Colour theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeCommands,
    },

    /// Check that the analysis service is reachable
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeCommands {
    /// Show the stored theme
    Show,

    /// Switch between dark and light
    Toggle,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(url) = cli.endpoint {
        config.endpoint.url = url;
    }

    match cli.command {
        Commands::Analyze { path, media_type, tab, save_visuals, html } => {
            run_analyze(config, path, media_type, tab, save_visuals, html, &cli.format).await
        }
        Commands::Theme { action } => run_theme_command(&config, action),
        Commands::Status => run_status(&config).await,
        Commands::Config { action } => run_config_command(&config, action),
    }
}

fn preference_store(config: &AppConfig) -> Box<JsonFileStore> {
    Box::new(JsonFileStore::new(PathBuf::from(&config.storage.preferences_path)))
}

/// Submit one image and print what the results screen shows
async fn run_analyze(
    config: AppConfig,
    path: PathBuf,
    media_type: Option<String>,
    tab: Option<String>,
    save_visuals: Option<PathBuf>,
    html: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let state = UiState::from_config(&config, preference_store(&config))?;
    let client = AnalysisClient::new(&config.endpoint)?;
    info!("Analysis endpoint: {}", client.analyze_url());

    let mut controller = Controller::new(state, client, StderrNotifier);
    let declared = media_type
        .clone()
        .unwrap_or_else(|| media_type_for_path(&path).to_string());
    let mut chooser = PathChooser::new(path.clone()).with_media_type(media_type);

    let submission = controller.choose_file(&mut chooser).await?;
    let Some(submission) = submission else {
        return Err(NotescopeError::FileSystem(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("cannot read {}", path.display()),
        )));
    };

    if let Some(tab) = tab {
        controller.select_tab(&tab)?;
    }

    if let Some(out) = &html {
        std::fs::write(out, report::render_html(controller.state()))?;
        info!("HTML report written to {:?}", out);
    }

    match (submission, controller.state().results()) {
        (Submission::Completed, Some(panel)) => {
            print_results(panel, format)?;
            if let Some(dir) = save_visuals {
                let stem = file_stem(&path);
                let written = report::save_visuals(panel, &dir, &stem)?;
                info!("Saved {} visuals to {:?}", written.len(), dir);
            }
            Ok(())
        }
        (Submission::Rejected, _) => Err(NotescopeError::InvalidFileType(declared)),
        _ => {
            error!("Analysis of {:?} did not complete", path);
            Err(NotescopeError::AnalysisIncomplete(path.display().to_string()))
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
        .to_string()
}

#[derive(Serialize)]
struct JsonResults<'a> {
    verdict: &'static str,
    confidence: &'a str,
    ocr_text: &'a str,
    features: &'a [notescope::render::FeatureRow],
}

fn print_results(panel: &ResultsPanel, format: &str) -> Result<()> {
    match format {
        "json" => {
            let out = JsonResults {
                verdict: panel.verdict.label(),
                confidence: &panel.confidence,
                ocr_text: &panel.ocr_text,
                features: &panel.features,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => print!("{}", report::render_text(panel)),
    }
    Ok(())
}

fn run_theme_command(config: &AppConfig, action: ThemeCommands) -> Result<()> {
    let mut theme = ThemePreference::load(preference_store(config));
    match action {
        ThemeCommands::Show => println!("{}", theme.theme()),
        ThemeCommands::Toggle => println!("{}", theme.toggle()?),
    }
    Ok(())
}

/// Report whether the analysis service answers
async fn run_status(config: &AppConfig) -> Result<()> {
    let client = AnalysisClient::new(&config.endpoint)?;
    match client.health_check().await {
        Ok(()) => {
            println!("Analysis service reachable at {}", config.endpoint.url);
            Ok(())
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            println!("Analysis service NOT reachable at {}", config.endpoint.url);
            Err(e)
        }
    }
}

fn run_config_command(config: &AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommands::Generate { output, force } => {
            if output.exists() && !force {
                return Err(NotescopeError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    output.display()
                )));
            }
            AppConfig::default().save(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_analyze_command() {
        let cli = Cli::try_parse_from([
            "notescope", "analyze", "/tmp/note.jpg", "--tab", "ocr", "--save-visuals", "/tmp/out",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { path, tab, save_visuals, html, media_type } => {
                assert_eq!(path, PathBuf::from("/tmp/note.jpg"));
                assert_eq!(tab.as_deref(), Some("ocr"));
                assert_eq!(save_visuals, Some(PathBuf::from("/tmp/out")));
                assert!(html.is_none());
                assert!(media_type.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_global_endpoint_after_subcommand() {
        let cli = Cli::try_parse_from([
            "notescope", "status", "--endpoint", "http://10.0.0.5:5000", "--quiet",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Status));
        assert_eq!(cli.endpoint.as_deref(), Some("http://10.0.0.5:5000"));
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_theme_toggle() {
        let cli = Cli::try_parse_from(["notescope", "theme", "toggle"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { action: ThemeCommands::Toggle }));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["notescope", "--format", "xml", "status"]).is_err());
    }

    #[tokio::test]
    async fn test_failed_analysis_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("note.jpg");
        std::fs::write(&image, [0xff, 0xd8, 0xff]).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = AppConfig::default();
        config.endpoint.url = format!("http://{}", listener.local_addr().unwrap());
        config.storage.preferences_path = dir.path().join("prefs.json").display().to_string();
        drop(listener);

        let err = run_analyze(config, image, None, None, None, None, "text")
            .await
            .unwrap_err();
        assert!(matches!(err, NotescopeError::AnalysisIncomplete(ref p) if p.ends_with("note.jpg")));
    }

    #[tokio::test]
    async fn test_rejected_file_reports_declared_type() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();

        let mut config = AppConfig::default();
        config.storage.preferences_path = dir.path().join("prefs.json").display().to_string();

        let err = run_analyze(config, notes, None, None, None, None, "text")
            .await
            .unwrap_err();
        assert!(matches!(err, NotescopeError::InvalidFileType(ref t) if t == "text/plain"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/scans/note_20.jpg")), "note_20");
    }
}
