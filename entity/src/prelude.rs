pub use super::campaign::Entity as Campaign;
pub use super::campaign_partner::Entity as CampaignPartner;
pub use super::campaign_revision::Entity as CampaignRevision;
pub use super::click::Entity as Click;
pub use super::commission_override::Entity as CommissionOverride;
pub use super::conversion_event::Entity as ConversionEvent;
pub use super::event_type::Entity as EventType;
pub use super::funnel_journey::Entity as FunnelJourney;
pub use super::partner::Entity as Partner;
pub use super::partner_link::Entity as PartnerLink;
pub use super::payout::Entity as Payout;
pub use super::payout_event::Entity as PayoutEvent;
pub use super::vendor::Entity as Vendor;
pub use super::visitor_cookie::Entity as VisitorCookie;
