use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

pub struct VendorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VendorRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        contact_email: &str,
    ) -> Result<entity::vendor::Model, DbErr> {
        let vendor = entity::vendor::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            contact_email: ActiveValue::Set(contact_email.to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        vendor.insert(self.db).await
    }
}
