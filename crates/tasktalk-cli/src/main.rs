//! tasktalk CLI: turn natural-language commands into structured task JSON.
//!
//! Thin front end over `tasktalk-client`: reads credentials and base URLs
//! from flags or the environment, builds the client, and exposes the three
//! client operations as subcommands. Expects a running `tasktalk-proxy`
//! (or any equivalent forwarder) behind the configured base URLs.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;

use tasktalk_client::GigaChatClient;
use tasktalk_common::{ClientConfig, Credentials};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OAuth2 client identifier
    #[arg(long, env = "GIGACHAT_CLIENT_ID")]
    client_id: String,

    /// OAuth2 client secret
    #[arg(long, env = "GIGACHAT_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Base URL of the token-issuance forwarding path
    #[arg(long, env = "GIGACHAT_AUTH_URL", default_value = "http://127.0.0.1:8010/auth-proxy")]
    auth_url: String,

    /// Base URL of the models/completions forwarding path
    #[arg(long, env = "GIGACHAT_API_URL", default_value = "http://127.0.0.1:8010/api-proxy")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify that credentials can obtain an access token
    Check,
    /// List the models available to this account
    Models,
    /// Extract a structured task from a natural-language command
    Extract {
        /// The command to convert, e.g. "Напомни сдать отчёт завтра в 12:00"
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ClientConfig::new(
        Credentials::new(&args.client_id, &args.client_secret),
        &args.auth_url,
        &args.api_url,
    );
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }
    debug!("using auth={} api={}", args.auth_url, args.api_url);

    let client = GigaChatClient::new(config).context("failed to initialize GigaChat client")?;

    match args.command {
        Command::Check => check(&client).await,
        Command::Models => models(&client).await,
        Command::Extract { text } => extract(&client, &text).await,
    }
}

async fn check(client: &GigaChatClient) -> Result<()> {
    if client.test_connection().await {
        println!("{} connected to GigaChat", "ok".green().bold());
        Ok(())
    } else {
        bail!("could not obtain an access token; check credentials and proxy")
    }
}

async fn models(client: &GigaChatClient) -> Result<()> {
    let models = client
        .list_models()
        .await
        .context("failed to list models")?;
    println!("{}", serde_json::to_string_pretty(&models)?);
    Ok(())
}

async fn extract(client: &GigaChatClient, text: &str) -> Result<()> {
    let result = client
        .chat_completion(text)
        .await
        .context("task extraction failed")?;

    println!("{}", result.content);
    match result.tokens_used {
        Some(tokens) => eprintln!("{} {tokens} tokens used", "·".dimmed()),
        None => eprintln!("{} token usage not reported", "·".dimmed()),
    }
    Ok(())
}
