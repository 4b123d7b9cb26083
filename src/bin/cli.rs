//! Folio CLI
//!
//! Command-line interface for Folio operations:
//! - Assemble the page to a file
//! - List and check configured components
//! - Check a running server
//! - Generate a default config

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use folio::components::{ComponentEvent, ComponentRegistry, FragmentSource};
use folio::config::Config;
use folio::page::{assemble_page_notifying, PageRequest};
use futures_util::future::join_all;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Assemble portfolio pages from HTML fragments")]
#[command(long_about = "Folio loads HTML fragments into the placeholders of a page shell.\nComponents are fetched concurrently; a failing component leaves its placeholder empty.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: FOLIO_CONFIG or the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL for `status`
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the page
    Assemble {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print component events to stderr as they happen
        #[arg(long)]
        events: bool,
    },

    /// List configured components in load order
    Components,

    /// Fetch the shell and every fragment, reporting failures
    Check,

    /// Show status of a running server
    Status,

    /// Show the profile with computed experience
    Profile,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = folio::logging::with_bootstrap_logging(|| match &cli.config {
        Some(path) => Config::load_with_env(path),
        None => Ok(Config::load_default()),
    })?;
    folio::logging::init(&config.logging);

    match cli.command {
        Commands::Assemble { output, events } => {
            let registry = config.registry()?;
            let source = config.site.fragment_source()?;

            let (tx, mut rx) = mpsc::unbounded_channel();
            let printer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    if !events {
                        continue;
                    }
                    match event {
                        ComponentEvent::Loaded { identifier } => eprintln!("loaded  {}", identifier),
                        ComponentEvent::AllLoaded => eprintln!("all components settled"),
                    }
                }
            });

            let page = assemble_page_notifying(
                PageRequest {
                    shell_path: &config.site.shell,
                    registry,
                    profile: Some(&config.profile),
                    today: Local::now().date_naive(),
                },
                source,
                tx,
            )
            .await?;
            printer.await.context("event printer failed")?;

            for failure in page.report.failures() {
                eprintln!(
                    "warning: {} ({}) not loaded: {:?}",
                    failure.identifier, failure.source_path, failure.outcome
                );
            }

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &page.html)?;
                    println!(
                        "Assembled {} ({}/{} components) in {}ms",
                        path.display(),
                        page.report.loaded_count(),
                        page.report.results.len(),
                        page.report.elapsed_ms
                    );
                }
                None => {
                    print!("{}", page.html);
                }
            }
        }

        Commands::Components => {
            let registry = config.registry()?;

            if cli.format == "json" {
                println!("{}", components_json(&registry)?);
            } else if registry.is_empty() {
                println!("No components configured.");
                println!();
                println!("Add one to your config:");
                println!("  [[components]]");
                println!("  identifier = \"header-placeholder\"");
                println!("  source_path = \"components/header.html\"");
            } else {
                println!("{:<6} {:<28} {}", "Order", "Identifier", "Source");
                println!("{}", "-".repeat(70));

                for component in registry.sorted() {
                    println!(
                        "{:<6} {:<28} {}",
                        component.order, component.identifier, component.source_path
                    );
                }
            }
        }

        Commands::Check => {
            let registry = config.registry()?;
            let source = config.site.fragment_source()?;

            let shell = source.fetch(&config.site.shell).await;
            let sorted = registry.sorted();
            let fetches = join_all(sorted.iter().map(|c| source.fetch(&c.source_path))).await;

            let mut failures = 0;
            match &shell {
                Ok(html) => println!("ok    {:<28} {} bytes", "(shell)", html.len()),
                Err(e) => {
                    failures += 1;
                    println!("FAIL  {:<28} {}", "(shell)", e);
                }
            }
            for (component, result) in sorted.iter().zip(fetches) {
                match result {
                    Ok(markup) => {
                        println!("ok    {:<28} {} bytes", component.identifier, markup.len())
                    }
                    Err(e) => {
                        failures += 1;
                        println!("FAIL  {:<28} {}", component.identifier, e);
                    }
                }
            }

            if failures > 0 {
                eprintln!();
                eprintln!("{} of {} fetches failed", failures, sorted.len() + 1);
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                        return Ok(());
                    }

                    println!(
                        "Folio v{}",
                        health["version"].as_str().unwrap_or(env!("CARGO_PKG_VERSION"))
                    );
                    println!();
                    println!("Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Source: {}", health["source"].as_str().unwrap_or("-"));
                    println!("Shell:  {}", health["shell"].as_str().unwrap_or("-"));
                    println!(
                        "Components: {}",
                        health["components"].as_u64().unwrap_or(0)
                    );
                    if let Some(failures) = health["last_failures"].as_u64() {
                        println!("Failed in last assembly: {}", failures);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("Server returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Folio at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin folio");
                    std::process::exit(1);
                }
            }
        }

        Commands::Profile => {
            let profile = &config.profile;
            let today = Local::now().date_naive();

            if cli.format == "json" {
                let mut value = serde_json::to_value(profile)?;
                value["experience_years"] = serde_json::json!(profile.experience_years(today));
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("Name:       {}", profile.name);
                println!("Title:      {}", profile.title);
                println!("Email:      {}", profile.email);
                println!("Location:   {}", profile.location);
                match profile.experience_years(today) {
                    Some(years) => println!("Experience: {} years", years),
                    None => println!("Experience: - (set profile.career_start)"),
                }
            }
        }

        Commands::Config { output } => {
            let config = folio::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Components as JSON, in the order they are loaded
fn components_json(registry: &ComponentRegistry) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&registry.sorted())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_json_uses_load_order() {
        let mut registry = ComponentRegistry::new();
        registry.register("footer", "components/footer.html", 3);
        registry.register("header", "components/header.html", 1);
        registry.register("about", "components/about.html", 1);

        let json: serde_json::Value =
            serde_json::from_str(&components_json(&registry).unwrap()).unwrap();
        let identifiers: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["identifier"].as_str().unwrap())
            .collect();

        assert_eq!(identifiers, vec!["header", "about", "footer"]);
        assert_eq!(json[2]["order"], 3);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(7260), "2h 1m");
        assert_eq!(format_duration(90000), "1d 1h");
    }
}
