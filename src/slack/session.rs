use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Minimal async surface of the Slack Web API used by the resolver, the
/// paginator and the processor. The concrete implementation is
/// [`SlackClient`].
#[async_trait::async_trait]
pub trait SlackApi: Send + Sync {
    /// POST a form-encoded Web API call. The token is added by the
    /// implementation. Responses carrying `"ok": false` are errors.
    async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value, ApiError>;

    /// GET a private file URL with bearer authentication.
    async fn fetch(&self, url: &str) -> reqwest::Result<reqwest::Response>;
}

/// Token-carrying Slack Web API client.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl SlackApi for SlackClient {
    async fn call(&self, method: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.api_url, method);
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        form.push(("token", self.token.as_str()));
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        tracing::debug!(method, "POST {}", url);
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                method: method.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ApiError::Http {
            method: method.to_string(),
            source,
        })?;
        let json: Value = serde_json::from_slice(&body).map_err(|source| ApiError::Json {
            method: method.to_string(),
            source,
        })?;

        if json.get("ok").and_then(Value::as_bool) == Some(false) {
            let reason = json
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            return Err(ApiError::Api {
                method: method.to_string(),
                reason: reason.to_string(),
            });
        }

        Ok(json)
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(url).bearer_auth(&self.token).send().await
    }
}

/// Decode a Web API response body into a typed payload.
pub(crate) fn decode<T: DeserializeOwned>(method: &str, json: Value) -> Result<T, ApiError> {
    serde_json::from_value(json).map_err(|source| ApiError::Json {
        method: method.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_call_posts_form_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.list"))
            .and(body_string_contains("token=xoxp-1"))
            .and(body_string_contains("count=500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "members": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri(), "xoxp-1");
        let json = client
            .call("users.list", &[("count", "500".to_string())])
            .await
            .unwrap();
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_call_ok_false_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/files.delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error": "cant_delete_file"
            })))
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri(), "t");
        let err = client
            .call("files.delete", &[("file", "F1".to_string())])
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Api { ref reason, .. } if reason == "cant_delete_file")
        );
    }

    #[tokio::test]
    async fn test_call_non_json_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri(), "t");
        let err = client.call("channels.list", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Json { .. }));
    }

    #[tokio::test]
    async fn test_call_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri(), "t");
        let err = client.call("files.list", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files-pri/T1-F1/download/a.txt"))
            .and(header("Authorization", "Bearer xoxp-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri(), "xoxp-2");
        let url = format!("{}/files-pri/T1-F1/download/a.txt", server.uri());
        let resp = client.fetch(&url).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), "hello");
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = SlackClient::new("http://localhost", "xoxp-secret");
        assert!(!format!("{:?}", client).contains("xoxp-secret"));
    }
}
