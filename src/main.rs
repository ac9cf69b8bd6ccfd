use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use clap::{Parser, Subcommand};
use rupasara::app::Gateway;
use rupasara::models::{GenerationRequest, GenerationResult};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "rupasara")]
#[command(about = "Search stock photos and generate images from prompts")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search stock photos.
    Search {
        query: String,
        /// Results page, starting at 1.
        #[arg(long)]
        page: Option<String>,
        /// Print the page context as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate an image from a prompt.
    Generate {
        prompt: String,
        /// gemini, inference or openai. Unknown names use the default provider.
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        style: Option<String>,
        /// Write the decoded image here instead of printing the data URI.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Decode a `data:<mime>;base64,<payload>` URI and write the bytes to `path`.
fn write_data_uri(data_uri: &str, path: &Path) -> Result<()> {
    let (_, payload) = data_uri
        .split_once(";base64,")
        .ok_or_else(|| anyhow!("not a base64 data URI"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("invalid base64 image payload")?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

async fn run(gateway: &Gateway, command: Command) -> Result<()> {
    match command {
        Command::Search { query, page, json } => {
            let page = gateway.search_page(&query, page.as_deref()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                for hit in &page.images {
                    println!(
                        "{}\t{}\t{}",
                        hit.full_url.as_deref().unwrap_or("-"),
                        hit.photographer.as_deref().unwrap_or("-"),
                        hit.page_url.as_deref().unwrap_or("-"),
                    );
                }
                info!(
                    "Page {} ({} results, more: {})",
                    page.page,
                    page.images.len(),
                    page.has_next
                );
            }
            match page.error_message {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            }
        }
        Command::Generate {
            prompt,
            provider,
            style,
            out,
        } => {
            let request = GenerationRequest {
                prompt,
                provider,
                style,
            };
            match gateway.generate(&request).await {
                GenerationResult::Success { image_data_uri } => {
                    match out {
                        Some(path) => {
                            write_data_uri(&image_data_uri, &path)?;
                            info!("Saved image to {}", path.display());
                        }
                        None => println!("{}", image_data_uri),
                    }
                    Ok(())
                }
                GenerationResult::Failure { message } => Err(anyhow!(message)),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rupasara=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let gateway = match Gateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&gateway, args.command).await {
        error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}
