use homegenius::{generators, logger, Config, DesignService};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    log::info!("🖼️  Available image models for {}:", config.provider);
    for model in generators::supported_models(config.provider) {
        log::info!("  {} - {} ({})", model.id, model.name, model.provider);
    }

    let service = DesignService::from_config(&config).await;
    if !service.is_configured() {
        log::error!("❌ Design requests will fail until the image provider is configured");
    }

    homegenius::server::run(config, service).await?;
    Ok(())
}
