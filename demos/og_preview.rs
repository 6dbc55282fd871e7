use clap::Parser;
use colored::Colorize;
use og_preview::{Extractor, LinkPreviewer, NetworkConfig, ProxyConfig};
use std::error::Error;
use std::time::Duration;

/// Print link preview metadata for one or more URLs.
#[derive(Parser, Debug)]
#[command(name = "og_preview")]
struct Args {
    /// Pages to preview
    #[arg(required = true)]
    urls: Vec<String>,

    #[arg(long, default_value = "Mozilla/5.0 (compatible; og-preview/0.1)")]
    user_agent: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = og_preview::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// HTTP proxy as host:port
    #[arg(long)]
    proxy: Option<String>,

    /// Maximum response body size in bytes
    #[arg(long)]
    max_body_size: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn parse_proxy(value: &str) -> Result<ProxyConfig, Box<dyn Error>> {
    let (host, port) = value
        .rsplit_once(':')
        .ok_or("proxy must be given as host:port")?;
    Ok(ProxyConfig::new(host, port.parse()?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = NetworkConfig::default().with_timeout(Duration::from_millis(args.timeout_ms));
    if let Some(proxy) = &args.proxy {
        config = config.with_proxy(parse_proxy(proxy)?);
    }
    if let Some(limit) = args.max_body_size {
        config = config.with_max_body_size(limit);
    }

    let previewer: Box<dyn LinkPreviewer + Send + Sync> = Box::new(Extractor::new(config)?);

    for url in &args.urls {
        match previewer.preview(url, &args.user_agent).await {
            Ok(result) if args.json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(result) => {
                println!("\n{}", url.bold().blue());
                println!("{}", "---------------".blue());
                let rows = [
                    ("Title", &result.title),
                    ("Description", &result.description),
                    ("Image", &result.image),
                    ("URL", &result.url),
                    ("Site Name", &result.site_name),
                    ("Type", &result.og_type),
                ];
                for (label, value) in rows {
                    if let Some(value) = value {
                        println!("{}: {}", label.bold(), value);
                    }
                }
            }
            Err(e) => {
                eprintln!("{}: {} - {}", "Error".bold().red(), url, e);
            }
        }
    }

    Ok(())
}
