//! Shared scaffolding for service tests.

/// Client that never routes loopback traffic through an env-configured proxy.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
