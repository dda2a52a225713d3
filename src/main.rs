use cohort_portal::config::PortalConfig;
use cohort_portal::server;
use std::error::Error;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = PortalConfig::load()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    log::info!(
        "Seeding demo store (points per award {}..={})",
        config.points.min,
        config.points.max
    );
    log::warn!("Demo authentication accepts any password for a known username");

    server::start_server(config).await?;

    Ok(())
}
