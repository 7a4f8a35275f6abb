//! CommitLens CLI - dashboard for commit analysis reports

#![deny(warnings)]

// Global invariants enforced:
// - One request in flight at a time (single-threaded runtime)
// - Rendered pages are written atomically

use anyhow::Context;
use clap::{Parser, Subcommand};
use commitlens_core::config::{self, ResolvedConfig};
use commitlens_core::document::ids;
use commitlens_core::html::TimelineFilter;
use commitlens_core::{
    render_recent_text, AnalysisOutcome, Dashboard, DashboardOptions, HttpReportApi, Level,
    PageDocument, ReportApi, Tab,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = ".commitlens/dashboard.html";

#[derive(Parser)]
#[command(name = "commitlens")]
#[command(about = "Dashboard for commit analysis reports")]
#[command(version = env!("COMMITLENS_VERSION"))]
struct Cli {
    /// Analysis backend URL (overrides config file)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Path to config file (default: auto-discover)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recent reports
    Recent {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Render the dashboard with a report open
    View {
        /// Report identifier (see `commitlens recent`)
        report_id: String,

        /// Tab to show (executive, timeline, technical, visual)
        #[arg(long, default_value = "executive", value_parser = parse_tab)]
        tab: Tab,

        /// Only show timeline commits of this category (e.g. feature, bugfix)
        #[arg(long)]
        category: Option<String>,

        /// Only show timeline commits of this impact level (high, medium, low)
        #[arg(long, value_parser = parse_level)]
        impact: Option<Level>,

        /// Output file path (default: .commitlens/dashboard.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Analyze a repository and render the resulting dashboard
    Analyze {
        /// Path to the git repository
        #[arg(long)]
        repo: PathBuf,

        /// Analysis timeframe (overrides config file)
        #[arg(long)]
        timeframe: Option<String>,

        /// Output file path (default: .commitlens/dashboard.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate or show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_tab(s: &str) -> Result<Tab, String> {
    Tab::parse(s).ok_or_else(|| format!("unknown tab: {}", s))
}

fn parse_level(s: &str) -> Result<Level, String> {
    Level::parse(s).ok_or_else(|| format!("invalid impact level: {}", s))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => run_config(action),
        Commands::Recent { format } => {
            let resolved = resolve_config(cli.config.as_deref(), cli.api.as_deref())?;
            let api = http_api(&resolved)?;
            let reports = api
                .list_recent()
                .await
                .context("failed to load recent reports")?;
            match format {
                OutputFormat::Text => print!("{}", render_recent_text(&reports)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            }
            Ok(())
        }
        Commands::View {
            report_id,
            tab,
            category,
            impact,
            output,
        } => {
            let resolved = resolve_config(cli.config.as_deref(), cli.api.as_deref())?;
            let mut dashboard = build_dashboard(&resolved)?;
            dashboard.load().await;
            dashboard.set_timeline_filter(TimelineFilter { category, impact });

            let viewed = dashboard.view_report(&report_id).await;
            if viewed.is_ok() {
                dashboard.select_tab(tab);
            }

            let output_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            write_html_report(&output_path, &dashboard.document().render_html())?;
            eprintln!("Dashboard written to: {}", output_path.display());

            viewed.with_context(|| format!("failed to load report {}", report_id))?;
            Ok(())
        }
        Commands::Analyze {
            repo,
            timeframe,
            output,
        } => {
            let resolved = resolve_config(cli.config.as_deref(), cli.api.as_deref())?;

            // Normalize path to absolute; the backend resolves it on its own filesystem
            let repo = if repo.is_relative() {
                std::env::current_dir()?.join(&repo)
            } else {
                repo
            };
            let timeframe = timeframe.unwrap_or_else(|| resolved.default_timeframe.clone());

            let mut dashboard = build_dashboard(&resolved)?;
            dashboard.load().await;
            let doc = dashboard.document_mut();
            doc.set_input(ids::REPO_PATH_INPUT, repo.display().to_string());
            doc.set_input(ids::TIMEFRAME_INPUT, timeframe.as_str());

            eprintln!(
                "Analyzing {} ({}) via {}...",
                repo.display(),
                timeframe,
                resolved.api_base_url
            );
            let outcome = dashboard.run_analysis().await;

            let output_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            write_html_report(&output_path, &dashboard.document().render_html())?;
            eprintln!("Dashboard written to: {}", output_path.display());

            match outcome.context("analysis request failed")? {
                AnalysisOutcome::Completed { commit_count, .. } => {
                    println!("Analysis complete: {} commits analyzed", commit_count);
                    Ok(())
                }
                AnalysisOutcome::NoCommits => {
                    println!("No commits found in the specified timeframe.");
                    Ok(())
                }
                AnalysisOutcome::Failed { error, .. } => {
                    anyhow::bail!("analysis failed: {}", error)
                }
            }
        }
    }
}

fn run_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Validate { path } => {
            let cwd = std::env::current_dir()?;
            match config::load_and_resolve(&cwd, path.as_deref()) {
                Ok(config) => {
                    if let Some(ref p) = config.config_path {
                        println!("Config valid: {}", p.display());
                    } else {
                        println!("No config file found. Using defaults.");
                    }
                }
                Err(e) => {
                    eprintln!("Config validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Show { path } => {
            let cwd = std::env::current_dir()?;
            let resolved = config::load_and_resolve(&cwd, path.as_deref())
                .context("failed to load configuration")?;

            println!("Configuration:");
            if let Some(ref p) = resolved.config_path {
                println!("  Source: {}", p.display());
            } else {
                println!("  Source: defaults (no config file found)");
            }
            println!();
            println!("Backend:");
            println!("  api_base_url: {}", resolved.api_base_url);
            println!(
                "  request_timeout_secs: {}",
                resolved.request_timeout.as_secs()
            );
            println!();
            println!("Dashboard:");
            println!(
                "  notification_ttl_ms: {}",
                resolved.notification_ttl.as_millis()
            );
            println!(
                "  technical_preview_limit: {}",
                resolved.technical_preview_limit
            );
            println!("  default_timeframe: {}", resolved.default_timeframe);
        }
    }
    Ok(())
}

/// Load configuration and apply CLI overrides
fn resolve_config(config_path: Option<&Path>, api: Option<&str>) -> anyhow::Result<ResolvedConfig> {
    let cwd = std::env::current_dir()?;
    let resolved =
        config::load_and_resolve(&cwd, config_path).context("failed to load configuration")?;
    tracing::debug!(source = ?resolved.config_path, "configuration loaded");
    match api {
        Some(url) => resolved.with_api_base_url(url),
        None => Ok(resolved),
    }
}

fn http_api(resolved: &ResolvedConfig) -> anyhow::Result<HttpReportApi> {
    HttpReportApi::new(&resolved.api_base_url, resolved.request_timeout)
        .context("failed to create backend client")
}

fn build_dashboard(resolved: &ResolvedConfig) -> anyhow::Result<Dashboard<HttpReportApi, PageDocument>> {
    let options = DashboardOptions {
        notification_ttl: resolved.notification_ttl,
        technical_preview_limit: resolved.technical_preview_limit,
    };
    Ok(Dashboard::new(http_api(resolved)?, PageDocument::new(), options))
}

/// Log to stderr; `RUST_LOG` overrides the default filter
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("commitlens=info,commitlens_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Write HTML page to file with atomic write pattern
fn write_html_report(path: &Path, html: &str) -> anyhow::Result<()> {
    use std::fs;

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    // Atomic write (temp + rename pattern)
    let temp_path = path.with_extension("html.tmp");
    fs::write(&temp_path, html)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_flags_use_core_parsers() {
        let cli = Cli::try_parse_from([
            "commitlens",
            "view",
            "report_1",
            "--tab",
            "visual",
            "--impact",
            "high",
        ])
        .unwrap();
        match cli.command {
            Commands::View { tab, impact, .. } => {
                assert_eq!(tab, Tab::Visual);
                assert_eq!(impact, Some(Level::High));
            }
            _ => panic!("expected view command"),
        }

        let cli = Cli::try_parse_from(["commitlens", "view", "report_1"]).unwrap();
        match cli.command {
            Commands::View { tab, impact, .. } => {
                assert_eq!(tab, Tab::Executive);
                assert_eq!(impact, None);
            }
            _ => panic!("expected view command"),
        }

        assert!(Cli::try_parse_from(["commitlens", "view", "report_1", "--tab", "charts"]).is_err());
        assert!(Cli::try_parse_from(["commitlens", "view", "report_1", "--impact", "High"]).is_err());
    }
}
