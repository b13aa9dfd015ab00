use imgen::config::Config;
use imgen::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        upstream = ?config.upstream,
        addr = %config.addr,
        server_key = config.api_key.is_some(),
        "starting imgen"
    );

    let state = AppState::new(config)?;
    server::serve(state).await?;

    Ok(())
}
