mod check;
mod history;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dropp-cli")]
#[command(about = "Monitor sale status and price of tracked items")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every configured source, build snapshots, and report changes
    Check {
        /// Restrict the run to a single item (by slug)
        #[arg(long)]
        item: Option<String>,

        /// Report changes without updating the snapshot history
        #[arg(long)]
        dry_run: bool,

        /// Print each change as one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Validate and list the item catalog
    Items,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = dropp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Check {
            item,
            dry_run,
            json,
        }) => {
            let options = check::CheckOptions {
                item_filter: item,
                dry_run,
                json,
            };
            check::run_check(&config, &options).await?;
        }
        Some(Commands::Items) => list_items(&config)?,
        None => println!("dropp-cli ready; run `dropp-cli check` to poll tracked items"),
    }

    Ok(())
}

fn list_items(config: &dropp_core::AppConfig) -> anyhow::Result<()> {
    let items = dropp_core::load_items(&config.items_path)?.items;
    for item in &items {
        let kinds: Vec<String> = item
            .source_kinds()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("{:<32} {:<40} [{}]", item.slug(), item.name, kinds.join(", "));
        if item.has_competing_availability_sources() {
            tracing::warn!(
                item = %item.slug(),
                "html_scrape and status_json both set availability; status_json takes precedence"
            );
        }
    }
    println!("{} items configured", items.len());
    Ok(())
}
