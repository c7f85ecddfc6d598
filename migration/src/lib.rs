pub use sea_orm_migration::prelude::*;

mod m20260807_000001_vendor;
mod m20260807_000002_partner;
mod m20260807_000003_campaign;
mod m20260807_000004_campaign_revision;
mod m20260807_000005_event_type;
mod m20260807_000006_campaign_partner;
mod m20260807_000007_commission_override;
mod m20260807_000008_partner_link;
mod m20260807_000009_visitor_cookie;
mod m20260807_000010_click;
mod m20260807_000011_conversion_event;
mod m20260807_000012_payout;
mod m20260807_000013_payout_event;
mod m20260807_000014_funnel_journey;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260807_000001_vendor::Migration),
            Box::new(m20260807_000002_partner::Migration),
            Box::new(m20260807_000003_campaign::Migration),
            Box::new(m20260807_000004_campaign_revision::Migration),
            Box::new(m20260807_000005_event_type::Migration),
            Box::new(m20260807_000006_campaign_partner::Migration),
            Box::new(m20260807_000007_commission_override::Migration),
            Box::new(m20260807_000008_partner_link::Migration),
            Box::new(m20260807_000009_visitor_cookie::Migration),
            Box::new(m20260807_000010_click::Migration),
            Box::new(m20260807_000011_conversion_event::Migration),
            Box::new(m20260807_000012_payout::Migration),
            Box::new(m20260807_000013_payout_event::Migration),
            Box::new(m20260807_000014_funnel_journey::Migration),
        ]
    }
}
