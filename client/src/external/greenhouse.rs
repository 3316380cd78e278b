//! Greenhouse REST API client
//!
//! Thin wrapper over the external API that owns harvests, the stage catalog
//! and growing units. Responses are decoded through `shared::payload`, so the
//! browser bindings and this client accept exactly the same documents.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{
    GrowingUnit, Harvest, HarvestStatus, HarvestStatusUpdate, NewHarvest, StageDefinition,
};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{AuthToken, Session};

/// Keys under which the login endpoint returns the token
const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token"];

/// Greenhouse API client
#[derive(Clone)]
pub struct GreenhouseClient {
    client: Client,
    base_url: Url,
    session: Session,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl GreenhouseClient {
    /// Create a new client
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::Configuration(format!("Invalid API base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "API base URL {} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            session: Session::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a token and keep it in the session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        shared::validate_email(email).map_err(|e| ClientError::validation("email", e))?;
        shared::validate_password(password).map_err(|e| ClientError::validation("password", e))?;

        tracing::info!(email, "Signing in to greenhouse API");
        let response = self
            .client
            .post(self.url(&["auth", "login"]))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let body: Value = self.read_json(response, "Session").await?;

        let token = extract_token(&body)
            .ok_or_else(|| ClientError::Decode("login response has no token".to_string()))?;
        self.session.set_token(AuthToken::new(token)).await;
        Ok(())
    }

    /// Use a token obtained elsewhere (e.g. configuration)
    pub async fn use_token(&self, token: &str) {
        self.session.set_token(AuthToken::new(token)).await;
    }

    pub async fn list_harvests(&self) -> ClientResult<Vec<Harvest>> {
        let body = self.get_json(self.url(&["harvests"]), "Harvests").await?;
        decode_list(body)
    }

    pub async fn get_harvest(&self, id: &str) -> ClientResult<Harvest> {
        let url = self.url(&["harvests", check_id(id)?]);
        let body = self.get_json(url, &format!("Harvest {}", id)).await?;
        decode_record(body)
    }

    pub async fn list_stage_definitions(&self) -> ClientResult<Vec<StageDefinition>> {
        let body = self.get_json(self.url(&["stages"]), "Stage catalog").await?;
        decode_list(body)
    }

    pub async fn list_units(&self) -> ClientResult<Vec<GrowingUnit>> {
        let body = self.get_json(self.url(&["units"]), "Growing units").await?;
        decode_list(body)
    }

    pub async fn create_harvest(&self, input: &NewHarvest) -> ClientResult<Harvest> {
        let request = self.client.post(self.url(&["harvests"])).json(input);
        let response = self.authorized(request).await?.send().await?;
        let body = self.read_json(response, "Harvest").await?;
        decode_record(body)
    }

    pub async fn update_harvest_status(
        &self,
        id: &str,
        status: HarvestStatus,
    ) -> ClientResult<Harvest> {
        let url = self.url(&["harvests", check_id(id)?, "status"]);
        let request = self.client.patch(url).json(&HarvestStatusUpdate { status });
        let response = self.authorized(request).await?.send().await?;
        let body = self
            .read_json(response, &format!("Harvest {}", id))
            .await?;
        decode_record(body)
    }

    async fn get_json(&self, url: Url, resource: &str) -> ClientResult<Value> {
        tracing::debug!(url = %url, "GET");
        let request = self.client.get(url);
        let response = self.authorized(request).await?.send().await?;
        self.read_json(response, resource).await
    }

    async fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.session.bearer(Utc::now()).await?;
        Ok(request.bearer_auth(token))
    }

    async fn read_json(&self, response: Response, resource: &str) -> ClientResult<Value> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), resource, "Greenhouse API request failed");

        match status {
            StatusCode::UNAUTHORIZED => {
                self.session.clear().await;
                Err(ClientError::Unauthorized(body))
            }
            StatusCode::FORBIDDEN => Err(ClientError::Unauthorized(body)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(resource.to_string())),
            _ => Err(ClientError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Base URL extended with percent-encoded path segments
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Ids become a single path segment. The URL parser drops `.`, `..` and
/// control characters, so ids that would collapse into another path are refused.
fn check_id(id: &str) -> ClientResult<&str> {
    let collapses = matches!(id.trim(), "" | "." | "..") || id.chars().any(char::is_control);
    if collapses {
        return Err(ClientError::validation("id", format!("Invalid id: {:?}", id)));
    }
    Ok(id)
}

/// Decode a list response, logging entries that had to be skipped
pub fn decode_list<T: DeserializeOwned>(body: Value) -> ClientResult<Vec<T>> {
    let decoded = shared::decode_list(body)?;
    for reason in &decoded.skipped {
        tracing::warn!(error = %reason, "Skipping malformed record");
    }
    if !decoded.skipped.is_empty() {
        tracing::warn!(
            kept = decoded.records.len(),
            skipped = decoded.skipped.len(),
            "Some records could not be decoded"
        );
    }
    Ok(decoded.records)
}

pub fn decode_record<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    Ok(shared::decode_record(body)?)
}

/// Find the token in a login response
pub fn extract_token(body: &Value) -> Option<String> {
    let payload = match body.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    };

    TOKEN_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str) -> GreenhouseClient {
        GreenhouseClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
            user_agent: "test".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_decode_list_drops_non_records() {
        let units: Vec<GrowingUnit> = decode_list(json!({ "data": [ { "id": 1 }, "oops", 3 ] })).unwrap();
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn test_decode_errors_map_to_client_errors() {
        let list: ClientResult<Vec<Harvest>> = decode_list(json!({ "message": "ok" }));
        assert!(matches!(list, Err(ClientError::Decode(_))));

        let record: ClientResult<Harvest> = decode_record(json!(null));
        assert!(matches!(record, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(&json!({ "token": "abc" })).as_deref(), Some("abc"));
        assert_eq!(
            extract_token(&json!({ "data": { "accessToken": "xyz" } })).as_deref(),
            Some("xyz")
        );
        assert_eq!(extract_token(&json!({ "token": "" })), None);
        assert_eq!(extract_token(&json!({ "user": {} })), None);
    }

    #[test]
    fn test_url_joins_base_path() {
        assert_eq!(
            client("http://localhost:8080/api/").url(&["harvests"]).as_str(),
            "http://localhost:8080/api/harvests"
        );
        assert_eq!(
            client("http://localhost:8080/api").url(&["harvests"]).as_str(),
            "http://localhost:8080/api/harvests"
        );
        assert_eq!(
            client("http://localhost:8080").url(&["auth", "login"]).as_str(),
            "http://localhost:8080/auth/login"
        );
    }

    #[test]
    fn test_url_encodes_ids() {
        let client = client("http://localhost:8080/api");
        assert_eq!(
            client.url(&["harvests", "../units"]).as_str(),
            "http://localhost:8080/api/harvests/..%2Funits"
        );
        assert_eq!(
            client.url(&["harvests", "1?x=", "status"]).as_str(),
            "http://localhost:8080/api/harvests/1%3Fx=/status"
        );
    }

    #[test]
    fn test_check_id() {
        assert_eq!(check_id("17").unwrap(), "17");
        assert!(check_id("..").is_err());
        assert!(check_id(".\t.").is_err());
        assert!(check_id(" ").is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GreenhouseClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 1,
            user_agent: "test".to_string(),
        });
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_requests_require_session() {
        let result = client("http://localhost:1").list_harvests().await;
        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    }
}
