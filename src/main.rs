mod config;
mod convert;
mod notion;
mod record;
mod stats;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde_json::json;
use tracing::{info, warn};

use crate::config::Settings;
use crate::notion::model::Block;
use crate::notion::schema;
use crate::notion::NotionClient;

#[derive(Parser)]
#[command(name = "leetnotion", about = "Save solved LeetCode problems to a Notion database")]
struct Cli {
    /// Settings file (default: ./leetnotion.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Target database id, overrides settings
    #[arg(short, long, global = true)]
    database: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert problem-description HTML files to content blocks (JSON)
    Convert {
        files: Vec<PathBuf>,
        /// Print the plain-text rendering instead of blocks
        #[arg(long, conflicts_with = "notion")]
        plain: bool,
        /// Print Notion block payloads instead of content blocks
        #[arg(long)]
        notion: bool,
    },
    /// Save a problem record as a page in the database
    Save {
        record: PathBuf,
        /// What to do when the problem already has a page
        #[arg(long, value_enum, default_value_t = OnDuplicate::Skip)]
        on_duplicate: OnDuplicate,
        /// Print the page payload without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// List databases shared with the integration
    Databases,
    /// Show solve counts and current streak
    Stats,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnDuplicate {
    /// Leave the existing page alone
    Skip,
    /// Create another page anyway
    New,
    /// Append this solution to the existing page
    Append,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { files, plain, notion } => convert_files(&files, plain, notion),
        Commands::Save {
            record,
            on_duplicate,
            dry_run,
        } => {
            let settings = load_settings(cli.config.as_deref(), cli.database)?;
            save(&settings, &record, on_duplicate, dry_run).await
        }
        Commands::Databases => {
            let settings = load_settings(cli.config.as_deref(), cli.database)?;
            let dbs = settings.client()?.search_databases().await?;
            if dbs.is_empty() {
                println!("No databases shared with this integration.");
                return Ok(());
            }

            println!("{:>3} | {:<32} | {:<36} | {}", "#", "Title", "Id", "Url");
            println!("{}", "-".repeat(110));
            for (i, db) in dbs.iter().enumerate() {
                println!(
                    "{:>3} | {:<32} | {:<36} | {}",
                    i + 1,
                    truncate(&db.title, 32),
                    db.id,
                    db.url.as_deref().unwrap_or("-")
                );
            }
            println!("\n{} databases", dbs.len());
            Ok(())
        }
        Commands::Stats => {
            let settings = load_settings(cli.config.as_deref(), cli.database)?;
            let pages = settings
                .client()?
                .query_all_pages(settings.database()?)
                .await?;
            let p = stats::progress(&pages, chrono::Local::now().date_naive());
            println!("Total:   {}", p.total);
            println!("Easy:    {}", p.easy);
            println!("Medium:  {}", p.medium);
            println!("Hard:    {}", p.hard);
            println!("Streak:  {} day{}", p.streak, if p.streak == 1 { "" } else { "s" });
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_settings(file: Option<&Path>, database: Option<String>) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(file)?;
    if database.is_some() {
        settings.database_id = database;
    }
    Ok(settings)
}

fn convert_files(files: &[PathBuf], plain: bool, notion: bool) -> anyhow::Result<()> {
    let outputs: Vec<_> = files
        .par_iter()
        .map(|path| -> anyhow::Result<serde_json::Value> {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value = if plain {
                json!(convert::plain_text(&html))
            } else if notion {
                let blocks: Vec<Block> = convert::convert(&html).iter().map(Block::from).collect();
                serde_json::to_value(blocks)?
            } else {
                serde_json::to_value(convert::convert(&html))?
            };
            Ok(json!({ "file": path.display().to_string(), "output": value }))
        })
        .collect();

    for output in outputs {
        println!("{}", serde_json::to_string_pretty(&output?)?);
    }
    Ok(())
}

async fn save(
    settings: &Settings,
    path: &Path,
    on_duplicate: OnDuplicate,
    dry_run: bool,
) -> anyhow::Result<()> {
    let record = record::load(path)?;
    let today = chrono::Local::now().date_naive();

    if dry_run {
        let draft = record::build_page(&record, today);
        let payload = json!({ "properties": draft.properties, "children": draft.children });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = settings.client()?;
    let database_id = settings.database()?;

    if settings.auto_provision {
        provision(&client, database_id).await?;
    }

    if on_duplicate != OnDuplicate::New {
        let existing = match client.find_page_by_url(database_id, &record.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Duplicate check failed, continuing: {}", e);
                None
            }
        };

        if let Some(page) = existing {
            let url = page.url.as_deref().unwrap_or(&page.id);
            if on_duplicate == OnDuplicate::Skip {
                println!("Already saved: {}", url);
                return Ok(());
            }
            let number = client.count_solutions(&page.id).await;
            let blocks = record::children::solution_blocks(&record, number, today);
            client
                .append_children(&page.id, &blocks)
                .await
                .context("Failed to append solution")?;
            println!("Added solution {} to {}", number, url);
            return Ok(());
        }
    }

    let draft = record::build_page(&record, today);
    info!(
        "Creating page for '{}' ({} blocks)",
        record.problem.display_title(),
        draft.children.len()
    );
    let page = client
        .create_page(database_id, &draft.properties, &draft.children)
        .await
        .context("Failed to create page")?;
    println!("Saved: {}", page.url.as_deref().unwrap_or(&page.id));
    Ok(())
}

/// Add any missing optional properties to the database schema.
async fn provision(client: &NotionClient, database_id: &str) -> anyhow::Result<()> {
    let db = client
        .retrieve_database(database_id)
        .await
        .context("Failed to read database schema")?;
    let missing = schema::missing_optional(&db.properties);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.keys().map(String::as_str).collect();
    info!("Adding database properties: {}", names.join(", "));
    client
        .add_properties(database_id, &missing)
        .await
        .context("Failed to add database properties")?;
    Ok(())
}

/// First `max` chars of `s`, with `...` appended when anything was cut.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, _) => format!("{:.1}s", d.as_secs_f64()),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, m, s) => format!("{}h {}m {}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate("Two Sum", 10), "Two Sum");
        assert_eq!(truncate("Longest Substring", 7), "Longest...");
        assert_eq!(truncate("Two Sum", 7), "Two Sum");
        assert_eq!(truncate("\u{1f600}\u{1f600}x", 2), "\u{1f600}\u{1f600}...");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(std::time::Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(std::time::Duration::from_secs(3725)), "1h 2m 5s");
    }
}
