use crate::{config::Config, error::Error, provider::PaymentProviderClient};

/// Build the payment provider client with the configured credentials
pub fn build_provider_client(config: &Config) -> Result<PaymentProviderClient, Error> {
    let provider = PaymentProviderClient::new(
        &config.payment_provider_url,
        &config.payment_provider_token,
    )?;

    Ok(provider)
}

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}
