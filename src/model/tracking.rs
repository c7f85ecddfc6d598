use serde::Deserialize;
use utoipa::IntoParams;

/// Request metadata captured alongside a click. Everything is optional;
/// tracking degrades rather than blocking the redirect.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RequestMeta {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    #[serde(skip)]
    pub referrer: Option<String>,
    #[serde(skip)]
    pub ip_address: Option<String>,
    #[serde(skip)]
    pub user_agent: Option<String>,
}
