use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cinebrowse-server")]
#[command(about = "Movie browsing front end for the TMDB API", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "cinebrowse.yaml")]
    config: String,

    /// Enable debug logging (cache hits and misses, upstream requests)
    #[arg(long)]
    debug: bool,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "cinebrowse_rs=debug,tower_http=debug"
    } else {
        "cinebrowse_rs=info,tower_http=info"
    };

    let json_layer = args
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!args.json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json_layer)
        .with(text_layer)
        .init();

    if let Err(e) = cinebrowse_rs::run(&args.config, args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
