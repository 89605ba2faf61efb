//! PayPal REST client (no SDK dependency)

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use shared::ProviderOrderDetail;

use super::{AccessToken, FetchOutcome, PaymentProvider, ProviderError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// PayPal client using OAuth2 client credentials
///
/// No timeout or retry is applied; a call blocks until the provider answers
/// or the connection fails.
#[derive(Clone)]
pub struct PaypalClient {
    http: reqwest::Client,
    api_base: Url,
    client_id: String,
    client_secret: String,
}

impl PaypalClient {
    pub fn new(
        api_base: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, BoxError> {
        let api_base = Url::parse(api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(format!("PayPal API base {api_base} cannot be a base URL").into());
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_base,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport(format!("{} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl PaymentProvider for PaypalClient {
    async fn authenticate(&self) -> Result<AccessToken, ProviderError> {
        let url = self.endpoint(&["v1", "oauth2", "token"])?;

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProviderError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Auth(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Auth(format!("unreadable token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(ProviderError::Auth("empty access token".into()));
        }

        tracing::debug!("Obtained PayPal access token");
        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_detail(&self, token: &AccessToken, correlation_id: &str) -> FetchOutcome {
        let url = match self.endpoint(&["v2", "checkout", "orders", correlation_id]) {
            Ok(url) => url,
            Err(e) => return FetchOutcome::TransportFailure(e),
        };

        let resp = match self.http.get(url).bearer_auth(token.as_str()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(correlation_id, error = %e, "PayPal order lookup failed");
                return FetchOutcome::TransportFailure(e.into());
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::debug!(correlation_id, %status, "PayPal has no order detail");
            return FetchOutcome::Miss {
                status: status.as_u16(),
            };
        }

        match resp.json::<ProviderOrderDetail>().await {
            Ok(detail) => FetchOutcome::Found(detail),
            Err(e) => {
                tracing::error!(correlation_id, error = %e, "Could not decode PayPal order detail");
                FetchOutcome::TransportFailure(ProviderError::Transport(format!(
                    "undecodable detail for {correlation_id}: {e}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments() {
        let client = PaypalClient::new("https://api-m.sandbox.paypal.com", "id", "secret").unwrap();
        let url = client.endpoint(&["v2", "checkout", "orders", "5O190127TN364715T"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-m.sandbox.paypal.com/v2/checkout/orders/5O190127TN364715T"
        );
    }

    #[test]
    fn test_endpoint_escapes_correlation_id() {
        let client = PaypalClient::new("http://127.0.0.1:9/base/", "id", "secret").unwrap();
        let url = client.endpoint(&["v2", "checkout", "orders", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/base/v2/checkout/orders/a%2Fb");
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(PaypalClient::new("not a url", "id", "secret").is_err());
        assert!(PaypalClient::new("mailto:billing@example.com", "id", "secret").is_err());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("A21AAF");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }
}
