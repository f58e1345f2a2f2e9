use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;
use vidtree::{
    system_locales, CoreClient, ExtractionContext, FilmixConfig, FilmixSE, StreamExtractor,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg()]
    url: String,

    /// JSON file with `session_cookie` and/or `filler_tokens`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session cookie value, overrides the config file
    #[arg(long, env = "VIDTREE_FILMIX_COOKIE")]
    cookie: Option<String>,

    /// Seconds allowed for every single request
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,
}

fn load_config(args: &Args) -> Result<FilmixConfig> {
    let mut config: FilmixConfig = match &args.config {
        Some(path) => serde_json::from_reader(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )
        .with_context(|| format!("parsing {}", path.display()))?,
        None => FilmixConfig::default(),
    };
    if let Some(cookie) = &args.cookie {
        config.session_cookie = cookie.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let url = Url::parse(&args.url)?;

    let filmix = FilmixSE::with_config(load_config(&args)?);
    let client = CoreClient::with_extractors(
        ExtractionContext::new_with_timeout(system_locales(), Duration::from_secs(args.timeout))?,
        vec![&filmix as &dyn StreamExtractor],
    );

    let Some(extraction) = client.extract_url(&url).await? else {
        bail!("no extractor for {}", url);
    };

    if args.compact {
        println!("{}", serde_json::to_string(&extraction)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    }

    Ok(())
}
