use thumbboard::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thumbboard=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    thumbboard::run(config).await
}
