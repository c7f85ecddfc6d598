pub mod campaign;
pub mod campaign_partner;
pub mod click;
pub mod commission_override;
pub mod conversion;
pub mod cookie;
pub mod event_type;
pub mod funnel;
pub mod partner;
pub mod partner_link;
pub mod payout;
pub mod vendor;
