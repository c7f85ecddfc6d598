use trackwire::{
    config::Config, error::Error, model::app::AppState, router, scheduler::cron::start_scheduler,
    startup,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let provider = startup::build_provider_client(&config)?;
    let db = startup::connect_to_database(&config).await?;

    start_scheduler(&db).await?;

    tracing::info!("Starting server on {}:{}", config.host, config.port);

    let router = router::routes().with_state(AppState { db, provider });
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    axum::serve(listener, router).await?;

    Ok(())
}
