//! [`MockProvider`]: a local stand-in for the Workers API.

use cf_workers_api::Config;
use serde_json::Value;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_ACCOUNT_ID: &str = "test-account";
pub const TEST_API_TOKEN: &str = "test-token";

/// A wiremock server plus a [`Config`] pointing at it.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() {
/// use cf_workers_test_utils::{MockProvider, envelope};
/// use serde_json::json;
///
/// let provider = MockProvider::start().await;
/// provider
///     .respond("GET", "/accounts/test-account/workers/scripts", 200, envelope::success(json!([])))
///     .await;
/// let config = provider.config();
/// # }
/// ```
pub struct MockProvider {
    server: MockServer,
}

impl MockProvider {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Configuration using the test credentials against this server.
    ///
    /// # Panics
    /// Panics if the server URI is not a valid base URL.
    pub fn config(&self) -> Config {
        let base = Url::parse(&self.server.uri())
            .unwrap_or_else(|e| panic!("MockProvider: bad server uri: {e}"));
        Config::with_api_base(TEST_ACCOUNT_ID, TEST_API_TOKEN, base)
            .unwrap_or_else(|e| panic!("MockProvider: invalid test config: {e}"))
    }

    /// Answer `http_method path` with `status` and a JSON `body`.
    pub async fn respond(&self, http_method: &str, endpoint: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `http_method path` with `status` and a raw, non-JSON body.
    pub async fn respond_raw(&self, http_method: &str, endpoint: &str, status: u16, body: &str) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Every request the server has seen so far.
    ///
    /// # Panics
    /// Panics if request recording was disabled on the server.
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_else(|| panic!("MockProvider: request recording is disabled"))
    }
}
