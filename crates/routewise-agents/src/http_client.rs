use reqwest::Client;

/// Set to bypass any system proxy, e.g. when adapters talk to local mocks.
const DISABLE_SYSTEM_PROXY_ENV: &str = "ROUTEWISE_DISABLE_SYSTEM_PROXY";

/// Shared client builder for every HTTP adapter in the crate.
pub(crate) fn build_http_client() -> Client {
    let direct = cfg!(test) || std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some();
    if !direct {
        return Client::new();
    }

    match Client::builder().no_proxy().build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to build proxy-less HTTP client, using defaults");
            Client::new()
        }
    }
}
