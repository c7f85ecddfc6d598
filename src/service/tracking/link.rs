//! Partner link minting.

use rand::{distr::Alphanumeric, Rng};
use sea_orm::{DatabaseConnection, SqlErr};

use crate::{data::partner_link::PartnerLinkRepository, error::Error};

/// Length of generated short codes.
static SHORT_CODE_LEN: usize = 8;
/// Collision retries before surfacing the storage error.
static MINT_ATTEMPTS: u32 = 3;

pub struct LinkService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LinkService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mints a unique short code and creates the link. Short codes are
    /// random alphanumerics; a collision retries with a fresh code.
    pub async fn create_link(
        &self,
        campaign_partner_id: i32,
        custom_params: Option<sea_orm::JsonValue>,
    ) -> Result<entity::partner_link::Model, Error> {
        let link_repo = PartnerLinkRepository::new(self.db);

        let mut attempt = 0;
        loop {
            let short_code = generate_short_code();

            match link_repo
                .create(&short_code, campaign_partner_id, custom_params.clone())
                .await
            {
                Ok(link) => return Ok(link),
                Err(err) => {
                    let collision =
                        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)));
                    attempt += 1;

                    if !collision || attempt >= MINT_ATTEMPTS {
                        return Err(err.into());
                    }

                    tracing::debug!(short_code, "Short code collision, retrying");
                }
            }
        }
    }
}

fn generate_short_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_CODE_LEN)
        .map(char::from)
        .collect()
}
