use sea_orm::DatabaseConnection;

use crate::provider::PaymentProviderClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub provider: PaymentProviderClient,
}

impl From<(DatabaseConnection, PaymentProviderClient)> for AppState {
    fn from((db, provider): (DatabaseConnection, PaymentProviderClient)) -> Self {
        Self { db, provider }
    }
}
