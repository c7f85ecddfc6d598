pub static TEST_PROVIDER_TOKEN: &str = "provider_token";
pub static TEST_CURRENCY: &str = "USD";
