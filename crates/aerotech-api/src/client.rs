// REST client for the maintenance backend.
//
// One method per endpoint. Each call logs the endpoint and outcome, maps
// non-2xx responses to `ApiError::Status` with the backend's `detail`
// message, and unwraps list envelopes (`{"tools": [...]}`) into plain
// vectors. No timeouts, retries or de-duplication: a request resolves or
// fails once.

use aerotech_core::config::ApiConfig;
use aerotech_core::models::analytics::{
    CompletedPackage, EfficiencyAnalysis, EfficiencyMetrics, MonthlyEfficiency, StatusResponse,
};
use aerotech_core::models::plan::{
    MaintenancePlan, PlanRequest, PlanReview, PlanReviewRequest, QaAnswer, QuestionRequest,
};
use aerotech_core::models::resources::{Part, Personnel, ResourceKind, ResourceRecord, Tool};
use aerotech_core::models::sprint::{
    ScrumDashboard, SprintPlanRequest, SprintPlanResponse, SprintStartRequest, SprintState,
};
use aerotech_core::models::user::{User, UserFilter};
use aerotech_core::models::work_package::{WorkPackage, WorkPackagePatch};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{error_message, ApiError};

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Typed client over the backend's JSON endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (absolute, e.g.
    /// `http://127.0.0.1:8000/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let invalid = |message: String| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            message,
        };

        let mut base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".into()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(ApiClient {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// Build a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let url = config.resolved_base_url();
        info!("API client targeting {}", url);
        Self::new(&url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ---- question answering and planning ----

    pub async fn ask(&self, question: &str) -> Result<QaAnswer, ApiError> {
        let url = self.endpoint(&["qa"])?;
        self.send_json(Method::POST, url, "Question", &QuestionRequest { question })
            .await
    }

    pub async fn plan_maintenance(&self, fault_description: &str) -> Result<MaintenancePlan, ApiError> {
        let url = self.endpoint(&["plan"])?;
        self.send_json(
            Method::POST,
            url,
            "Plan request",
            &PlanRequest { fault_description },
        )
        .await
    }

    pub async fn review_plan(&self, request: &PlanReviewRequest) -> Result<PlanReview, ApiError> {
        let url = self.endpoint(&["plan", "review"])?;
        self.send_json(Method::POST, url, "Plan review", request).await
    }

    // ---- sprint lifecycle ----

    pub async fn sprint_state(&self) -> Result<SprintState, ApiError> {
        let url = self.endpoint(&["sprint", "state"])?;
        self.get(url, "Sprint state fetch").await
    }

    pub async fn start_sprint(&self, request: &SprintStartRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&["sprint", "start"])?;
        self.send_json::<Value, _>(Method::POST, url, "Sprint start", request)
            .await
            .map(drop)
    }

    pub async fn end_sprint(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["sprint", "end"])?;
        self.send_empty::<Value>(Method::POST, url, "Sprint end")
            .await
            .map(drop)
    }

    pub async fn sprint_plan(&self, request: &str) -> Result<SprintPlanResponse, ApiError> {
        let url = self.endpoint(&["sprint", "plan"])?;
        self.send_json(
            Method::POST,
            url,
            "Sprint plan request",
            &SprintPlanRequest { request },
        )
        .await
    }

    pub async fn scrum_dashboard(&self) -> Result<ScrumDashboard, ApiError> {
        let url = self.endpoint(&["scrum", "dashboard"])?;
        self.get(url, "Scrum dashboard fetch").await
    }

    // ---- resources ----

    pub async fn personnel(&self) -> Result<Vec<Personnel>, ApiError> {
        self.resource_list(ResourceKind::Personnel).await
    }

    pub async fn tools(&self) -> Result<Vec<Tool>, ApiError> {
        self.resource_list(ResourceKind::Tools).await
    }

    pub async fn parts(&self) -> Result<Vec<Part>, ApiError> {
        self.resource_list(ResourceKind::Parts).await
    }

    pub async fn resource(&self, kind: ResourceKind, id: &str) -> Result<ResourceRecord, ApiError> {
        let url = self.endpoint(&["resources", kind.path(), id])?;
        let operation = format!("{} fetch", kind.label());
        Ok(match kind {
            ResourceKind::Personnel => ResourceRecord::Personnel(self.get(url, &operation).await?),
            ResourceKind::Tools => ResourceRecord::Tool(self.get(url, &operation).await?),
            ResourceKind::Parts => ResourceRecord::Part(self.get(url, &operation).await?),
        })
    }

    pub async fn create_resource(&self, record: &ResourceRecord) -> Result<(), ApiError> {
        let kind = record.kind();
        let url = self.endpoint(&["resources", kind.path()])?;
        let operation = format!("Create {}", kind.label().to_lowercase());
        self.send_record(Method::POST, url, &operation, record).await
    }

    pub async fn update_resource(&self, record: &ResourceRecord) -> Result<(), ApiError> {
        let kind = record.kind();
        let url = self.endpoint(&["resources", kind.path(), record.id()])?;
        let operation = format!("Update {}", kind.label().to_lowercase());
        self.send_record(Method::PUT, url, &operation, record).await
    }

    pub async fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["resources", kind.path(), id])?;
        let operation = format!("Delete {}", kind.label().to_lowercase());
        self.send_empty::<Value>(Method::DELETE, url, &operation)
            .await
            .map(drop)
    }

    // ---- work packages ----

    pub async fn work_packages(&self) -> Result<Vec<WorkPackage>, ApiError> {
        let url = self.endpoint(&["work-packages"])?;
        self.get_list(url, "Work packages fetch", "work_packages").await
    }

    pub async fn work_package(&self, id: &str) -> Result<WorkPackage, ApiError> {
        let url = self.endpoint(&["work-packages", id])?;
        self.get(url, "Work package fetch").await
    }

    pub async fn create_work_package(&self, record: &WorkPackage) -> Result<(), ApiError> {
        let url = self.endpoint(&["work-packages"])?;
        self.send_json::<Value, _>(Method::POST, url, "Create work package", record)
            .await
            .map(drop)
    }

    pub async fn update_work_package(&self, id: &str, patch: &WorkPackagePatch) -> Result<(), ApiError> {
        let url = self.endpoint(&["work-packages", id])?;
        self.send_json::<Value, _>(Method::PUT, url, "Update work package", patch)
            .await
            .map(drop)
    }

    pub async fn delete_work_package(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["work-packages", id])?;
        self.send_empty::<Value>(Method::DELETE, url, "Delete work package")
            .await
            .map(drop)
    }

    /// Packages assigned to one user. An empty id short-circuits to an
    /// empty list without touching the network.
    pub async fn user_work_packages(&self, user_id: &str) -> Result<Vec<WorkPackage>, ApiError> {
        if user_id.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["users", user_id, "work-packages"])?;
        self.get_list(url, "User work packages fetch", "work_packages")
            .await
    }

    // ---- users ----

    pub async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        let mut url = self.endpoint(&["users"])?;
        let pairs = filter.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self.get_list(url, "Users fetch", "users").await
    }

    pub async fn user(&self, id: &str) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id])?;
        self.get(url, "User fetch").await
    }

    pub async fn create_user(&self, user: &User) -> Result<(), ApiError> {
        let url = self.endpoint(&["users"])?;
        self.send_json::<Value, _>(Method::POST, url, "Create user", user)
            .await
            .map(drop)
    }

    pub async fn update_user(&self, id: &str, user: &User) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", id])?;
        self.send_json::<Value, _>(Method::PUT, url, "Update user", user)
            .await
            .map(drop)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", id])?;
        self.send_empty::<Value>(Method::DELETE, url, "Delete user")
            .await
            .map(drop)
    }

    // ---- analytics ----

    pub async fn record_completion(&self, record: &CompletedPackage) -> Result<StatusResponse, ApiError> {
        let url = self.endpoint(&["analytics", "completed"])?;
        self.send_json(Method::POST, url, "Add completed package", record)
            .await
    }

    pub async fn efficiency_metrics(&self) -> Result<EfficiencyMetrics, ApiError> {
        let url = self.endpoint(&["efficiency", "metrics"])?;
        self.get(url, "Efficiency metrics fetch").await
    }

    pub async fn efficiency_monthly(&self) -> Result<Vec<MonthlyEfficiency>, ApiError> {
        let url = self.endpoint(&["efficiency", "monthly"])?;
        self.get_list(url, "Efficiency monthly fetch", "monthly").await
    }

    pub async fn efficiency_analysis(&self) -> Result<EfficiencyAnalysis, ApiError> {
        let url = self.endpoint(&["analytics", "efficiency"])?;
        self.get(url, "Analytics efficiency fetch").await
    }

    // ---- plumbing ----

    /// Append path segments to the base URL. Each segment is percent-encoded
    /// on its own, so ids containing `/` or spaces stay one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                url: self.base.to_string(),
                message: "URL cannot be a base".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn resource_list<T: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(&["resources", kind.path()])?;
        let operation = format!("{} fetch", kind.label());
        self.get_list(url, &operation, kind.path()).await
    }

    async fn send_record(
        &self,
        method: Method,
        url: Url,
        operation: &str,
        record: &ResourceRecord,
    ) -> Result<(), ApiError> {
        let result = match record {
            ResourceRecord::Personnel(p) => self.send_json::<Value, _>(method, url, operation, p).await,
            ResourceRecord::Tool(t) => self.send_json::<Value, _>(method, url, operation, t).await,
            ResourceRecord::Part(p) => self.send_json::<Value, _>(method, url, operation, p).await,
        };
        result.map(drop)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, operation: &str) -> Result<T, ApiError> {
        let request = self.http.request(Method::GET, url.clone());
        self.execute(Method::GET, url, operation, request).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        operation: &str,
        envelope_key: &str,
    ) -> Result<Vec<T>, ApiError> {
        let value: Value = self.get(url, operation).await?;
        unwrap_envelope(value, envelope_key, operation)
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        url: Url,
        operation: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.request(method.clone(), url.clone()).json(body);
        self.execute(method, url, operation, request).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        operation: &str,
    ) -> Result<T, ApiError> {
        let request = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.execute(method, url, operation, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, url);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("{} {} transport error: {}", method, url, e);
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(operation, status, &body);
            warn!("{} {} -> {}: {}", method, url, status, message);
            return Err(ApiError::Status { status, message });
        }

        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        decode_body(&body, operation)
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Decode a success body. An empty body reads as JSON `null`, which suits
/// callers that discard mutation responses.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str, operation: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}

/// Pull `value[key]` out as a list. A missing or null key is an empty list.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    value: Value,
    key: &str,
    operation: &str,
) -> Result<Vec<T>, ApiError> {
    let items = match value {
        Value::Object(mut map) => map.remove(key).unwrap_or(Value::Null),
        _ => Value::Null,
    };
    if items.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(items).map_err(|e| ApiError::Decode {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("http://127.0.0.1:8000/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8000/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new("/api").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
        let err = ApiClient::new("mailto:ops@example.com").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn from_config_joins_relative_base() {
        let config = ApiConfig {
            origin: "http://hangar.local:9000/".into(),
            base_url: "/api".into(),
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://hangar.local:9000/api/");
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = ApiClient::new("http://h/api/").unwrap();
        let url = client.endpoint(&["resources", "tools", "T-1"]).unwrap();
        assert_eq!(url.as_str(), "http://h/api/resources/tools/T-1");
    }

    #[test]
    fn endpoint_percent_encodes_ids() {
        let client = ApiClient::new("http://h/api").unwrap();
        let url = client.endpoint(&["work-packages", "WP 1/2"]).unwrap();
        assert_eq!(url.as_str(), "http://h/api/work-packages/WP%201%2F2");
    }

    #[test]
    fn endpoint_at_root_base() {
        let client = ApiClient::new("http://h").unwrap();
        let url = client.endpoint(&["qa"]).unwrap();
        assert_eq!(url.as_str(), "http://h/qa");
    }

    #[test]
    fn envelope_unwraps_key() {
        let tools: Vec<Tool> =
            unwrap_envelope(json!({"tools": [{"id": "T-1", "name": "Torque wrench"}]}), "tools", "op").unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "Torque wrench");
    }

    #[test]
    fn envelope_missing_or_null_is_empty() {
        let parts: Vec<Part> = unwrap_envelope(json!({}), "parts", "op").unwrap();
        assert!(parts.is_empty());
        let parts: Vec<Part> = unwrap_envelope(json!({"parts": null}), "parts", "op").unwrap();
        assert!(parts.is_empty());
        let parts: Vec<Part> = unwrap_envelope(json!([1, 2]), "parts", "op").unwrap();
        assert!(parts.is_empty());
    }

    #[test]
    fn envelope_with_wrong_shape_is_decode_error() {
        let result: Result<Vec<Part>, _> = unwrap_envelope(json!({"parts": "nope"}), "parts", "Parts fetch");
        match result {
            Err(ApiError::Decode { operation, .. }) => assert_eq!(operation, "Parts fetch"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let v: Value = decode_body("", "op").unwrap();
        assert!(v.is_null());
        let v: Value = decode_body("  \n", "op").unwrap();
        assert!(v.is_null());
    }

    #[tokio::test]
    async fn empty_user_id_skips_request() {
        // Port 9 (discard) would fail if a request were attempted.
        let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        let packages = client.user_work_packages("").await.unwrap();
        assert!(packages.is_empty());
    }
}
