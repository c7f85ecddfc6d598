use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter,
};

use entity::partner::{PartnerStatus, PartnerTier};

pub struct PartnerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PartnerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a partner in `pending` status at the `standard` tier.
    pub async fn create(&self, name: &str, email: &str) -> Result<entity::partner::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let partner = entity::partner::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            email: ActiveValue::Set(email.to_string()),
            status: ActiveValue::Set(PartnerStatus::Pending),
            tier: ActiveValue::Set(PartnerTier::Standard),
            payment_method: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        partner.insert(self.db).await
    }

    pub async fn get(&self, partner_id: i32) -> Result<Option<entity::partner::Model>, DbErr> {
        entity::prelude::Partner::find_by_id(partner_id).one(self.db).await
    }

    pub async fn set_status(
        &self,
        partner_id: i32,
        status: PartnerStatus,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Partner::update_many()
            .col_expr(entity::partner::Column::Status, Expr::value(status))
            .col_expr(
                entity::partner::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::partner::Column::Id.eq(partner_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Partners with a payout destination on file, eligible for scheduled
    /// payout sweeps.
    pub async fn find_payable(&self) -> Result<Vec<entity::partner::Model>, DbErr> {
        entity::prelude::Partner::find()
            .filter(entity::partner::Column::Status.eq(PartnerStatus::Active))
            .filter(entity::partner::Column::PaymentMethod.is_not_null())
            .all(self.db)
            .await
    }
}
