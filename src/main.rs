use horoscope::api::router;
use horoscope::config::config;
use horoscope::state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let conf = config()?;
    tracing::info!(port = conf.port, backend = %conf.store.backend, "Starting Beer Horoscope");

    let state = AppState::from_config(conf).await?;

    let app = router(state);
    let addr = format!("0.0.0.0:{}", conf.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server bound");

    axum::serve(listener, app).await?;

    Ok(())
}
