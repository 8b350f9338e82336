use spa_booking::{app, config::AppConfig, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        store = ?config.store,
        slots = config.schedule.len(),
        "configuration loaded"
    );

    let app_state = AppState::init(config).await?;
    let app = app::build_app(app_state);
    app::serve(app).await
}
