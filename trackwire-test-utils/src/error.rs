use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestError {
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    #[error(transparent)]
    ProviderError(#[from] trackwire::error::provider::ProviderError),
    #[error(transparent)]
    ServerError(#[from] trackwire::error::Error),
}
