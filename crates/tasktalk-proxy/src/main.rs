//! tasktalk-proxy binary serving the two forwarding paths.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use log::info;

use tasktalk_proxy::{ProxyState, router};

#[derive(Parser, Debug)]
#[command(author, version, about = "Forwarding proxy for the GigaChat auth and API upstreams")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8010")]
    listen: SocketAddr,

    /// Upstream host for the /auth-proxy path (token issuance)
    #[arg(long, env = "TASKTALK_AUTH_UPSTREAM", default_value = "https://ngw.devices.sberbank.ru:9443")]
    auth_upstream: String,

    /// Upstream host for the /api-proxy path (models and completions)
    #[arg(long, env = "TASKTALK_API_UPSTREAM", default_value = "https://gigachat.devices.sberbank.ru")]
    api_upstream: String,

    /// Skip upstream certificate verification (the Sber hosts present a
    /// certificate chain most local trust stores do not carry)
    #[arg(long)]
    insecure: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let state = ProxyState::new(&args.auth_upstream, &args.api_upstream, args.insecure)
        .context("failed to build outbound HTTP client")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!(
        "listening on {} (auth -> {}, api -> {})",
        args.listen, args.auth_upstream, args.api_upstream
    );

    axum::serve(listener, app)
        .await
        .context("proxy server exited")?;
    Ok(())
}
