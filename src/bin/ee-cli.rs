use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

use experience_ecuador::i18n::{translate_path, Locale};

#[derive(Parser)]
#[command(name = "ee-cli")]
#[command(about = "Diagnostic CLI for the Experience Ecuador edge API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8788")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the edge service is up
    Health,
    /// Daily forecast for a coordinate
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
    /// Current conditions for the configured regions
    RegionsWeather,
    /// Public onboarding settings
    OnboardingConfig,
    /// Verify a Turnstile token through the edge
    VerifyToken { token: String },
    /// Translate a site path locally (no server needed)
    Translate {
        path: String,
        #[arg(long, value_enum)]
        to: Lang,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Lang {
    En,
    Es,
}

impl From<Lang> for Locale {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => Locale::En,
            Lang::Es => Locale::Es,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let base = cli.base_url.trim_end_matches('/');
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{base}/api/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Weather { lat, lon } => {
            let res = client
                .get(format!("{base}/api/weather"))
                .query(&[("lat", lat), ("lon", lon)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::RegionsWeather => {
            let res = client
                .get(format!("{base}/api/regions-weather"))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::OnboardingConfig => {
            let res = client
                .get(format!("{base}/api/onboarding-config"))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::VerifyToken { token } => {
            let res = client
                .post(format!("{base}/api/turnstile-verify"))
                .json(&json!({ "token": token }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Translate { path, to } => {
            println!("{}", translate_path(&path, to.into()));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(cache) = res.headers().get("x-ee-cache") {
        eprintln!("cache: {}", cache.to_str().unwrap_or("?"));
    }
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{text}"),
    }
    if !status.is_success() {
        eprintln!("Error: edge API returned status {status}");
        std::process::exit(1);
    }
    Ok(())
}
