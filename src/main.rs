use anyhow::Result;
use spamfilter::{
    config,
    infrastructure::{directories, logging},
    SpamFilterApp,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let logs_dir = directories::ensure_logs_dir(&config.directories)?;
    logging::init_tracing(&config.logging, &logs_dir)?;

    let app = SpamFilterApp::initialize(config).await?;
    app.run().await
}
