use {
    clap::Parser,
    teller::{Teller, config::TellerServerConfig},
    tracing::error,
};

#[derive(Parser)]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match TellerServerConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet, so this goes straight to stderr.
            eprintln!("Error: failed to load server config file: {e}");
            return;
        }
    };

    let app = Teller::new(config);

    if let Err(e) = app.run().await {
        error!("Teller failed to run: {}", e);
    }
}
