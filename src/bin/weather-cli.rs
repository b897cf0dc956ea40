use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "weather-cli")]
#[command(about = "Query a running weather relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000", env = "WEATHER_RELAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the relay is up
    Health,
    /// Show the most recent observation
    Latest,
    /// List recent observations, newest first
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/api/health", base)),
        Commands::Latest => client.get(format!("{}/api/weather/latest", base)),
        Commands::History { limit } => client
            .get(format!("{}/api/weather/history", base))
            .query(&[("limit", limit)]),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
