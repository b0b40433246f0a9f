// The orchestrator talks to the backend through this trait so it can run
// against an in-memory fake in tests.

use aerotech_core::models::analytics::{
    CompletedPackage, EfficiencyAnalysis, EfficiencyMetrics, MonthlyEfficiency, StatusResponse,
};
use aerotech_core::models::plan::{MaintenancePlan, PlanReview, PlanReviewRequest, QaAnswer};
use aerotech_core::models::resources::{Part, Personnel, ResourceKind, ResourceRecord, Tool};
use aerotech_core::models::sprint::{ScrumDashboard, SprintPlanResponse, SprintStartRequest, SprintState};
use aerotech_core::models::user::{User, UserFilter};
use aerotech_core::models::work_package::{WorkPackage, WorkPackagePatch};
use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Every backend operation the console issues.
#[async_trait]
pub trait MaintenanceApi: Send + Sync {
    async fn ask(&self, question: &str) -> Result<QaAnswer, ApiError>;
    async fn plan_maintenance(&self, fault_description: &str) -> Result<MaintenancePlan, ApiError>;
    async fn review_plan(&self, request: &PlanReviewRequest) -> Result<PlanReview, ApiError>;

    async fn sprint_state(&self) -> Result<SprintState, ApiError>;
    async fn start_sprint(&self, request: &SprintStartRequest) -> Result<(), ApiError>;
    async fn end_sprint(&self) -> Result<(), ApiError>;
    async fn sprint_plan(&self, request: &str) -> Result<SprintPlanResponse, ApiError>;
    async fn scrum_dashboard(&self) -> Result<ScrumDashboard, ApiError>;

    async fn personnel(&self) -> Result<Vec<Personnel>, ApiError>;
    async fn tools(&self) -> Result<Vec<Tool>, ApiError>;
    async fn parts(&self) -> Result<Vec<Part>, ApiError>;
    async fn resource(&self, kind: ResourceKind, id: &str) -> Result<ResourceRecord, ApiError>;
    async fn create_resource(&self, record: &ResourceRecord) -> Result<(), ApiError>;
    async fn update_resource(&self, record: &ResourceRecord) -> Result<(), ApiError>;
    async fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError>;

    async fn work_packages(&self) -> Result<Vec<WorkPackage>, ApiError>;
    async fn work_package(&self, id: &str) -> Result<WorkPackage, ApiError>;
    async fn create_work_package(&self, record: &WorkPackage) -> Result<(), ApiError>;
    async fn update_work_package(&self, id: &str, patch: &WorkPackagePatch) -> Result<(), ApiError>;
    async fn delete_work_package(&self, id: &str) -> Result<(), ApiError>;
    async fn user_work_packages(&self, user_id: &str) -> Result<Vec<WorkPackage>, ApiError>;

    async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, ApiError>;
    async fn user(&self, id: &str) -> Result<User, ApiError>;
    async fn create_user(&self, user: &User) -> Result<(), ApiError>;
    async fn update_user(&self, id: &str, user: &User) -> Result<(), ApiError>;
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    async fn record_completion(&self, record: &CompletedPackage) -> Result<StatusResponse, ApiError>;
    async fn efficiency_metrics(&self) -> Result<EfficiencyMetrics, ApiError>;
    async fn efficiency_monthly(&self) -> Result<Vec<MonthlyEfficiency>, ApiError>;
    async fn efficiency_analysis(&self) -> Result<EfficiencyAnalysis, ApiError>;
}

#[async_trait]
impl MaintenanceApi for ApiClient {
    async fn ask(&self, question: &str) -> Result<QaAnswer, ApiError> {
        ApiClient::ask(self, question).await
    }

    async fn plan_maintenance(&self, fault_description: &str) -> Result<MaintenancePlan, ApiError> {
        ApiClient::plan_maintenance(self, fault_description).await
    }

    async fn review_plan(&self, request: &PlanReviewRequest) -> Result<PlanReview, ApiError> {
        ApiClient::review_plan(self, request).await
    }

    async fn sprint_state(&self) -> Result<SprintState, ApiError> {
        ApiClient::sprint_state(self).await
    }

    async fn start_sprint(&self, request: &SprintStartRequest) -> Result<(), ApiError> {
        ApiClient::start_sprint(self, request).await
    }

    async fn end_sprint(&self) -> Result<(), ApiError> {
        ApiClient::end_sprint(self).await
    }

    async fn sprint_plan(&self, request: &str) -> Result<SprintPlanResponse, ApiError> {
        ApiClient::sprint_plan(self, request).await
    }

    async fn scrum_dashboard(&self) -> Result<ScrumDashboard, ApiError> {
        ApiClient::scrum_dashboard(self).await
    }

    async fn personnel(&self) -> Result<Vec<Personnel>, ApiError> {
        ApiClient::personnel(self).await
    }

    async fn tools(&self) -> Result<Vec<Tool>, ApiError> {
        ApiClient::tools(self).await
    }

    async fn parts(&self) -> Result<Vec<Part>, ApiError> {
        ApiClient::parts(self).await
    }

    async fn resource(&self, kind: ResourceKind, id: &str) -> Result<ResourceRecord, ApiError> {
        ApiClient::resource(self, kind, id).await
    }

    async fn create_resource(&self, record: &ResourceRecord) -> Result<(), ApiError> {
        ApiClient::create_resource(self, record).await
    }

    async fn update_resource(&self, record: &ResourceRecord) -> Result<(), ApiError> {
        ApiClient::update_resource(self, record).await
    }

    async fn delete_resource(&self, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_resource(self, kind, id).await
    }

    async fn work_packages(&self) -> Result<Vec<WorkPackage>, ApiError> {
        ApiClient::work_packages(self).await
    }

    async fn work_package(&self, id: &str) -> Result<WorkPackage, ApiError> {
        ApiClient::work_package(self, id).await
    }

    async fn create_work_package(&self, record: &WorkPackage) -> Result<(), ApiError> {
        ApiClient::create_work_package(self, record).await
    }

    async fn update_work_package(&self, id: &str, patch: &WorkPackagePatch) -> Result<(), ApiError> {
        ApiClient::update_work_package(self, id, patch).await
    }

    async fn delete_work_package(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_work_package(self, id).await
    }

    async fn user_work_packages(&self, user_id: &str) -> Result<Vec<WorkPackage>, ApiError> {
        ApiClient::user_work_packages(self, user_id).await
    }

    async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        ApiClient::users(self, filter).await
    }

    async fn user(&self, id: &str) -> Result<User, ApiError> {
        ApiClient::user(self, id).await
    }

    async fn create_user(&self, user: &User) -> Result<(), ApiError> {
        ApiClient::create_user(self, user).await
    }

    async fn update_user(&self, id: &str, user: &User) -> Result<(), ApiError> {
        ApiClient::update_user(self, id, user).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_user(self, id).await
    }

    async fn record_completion(&self, record: &CompletedPackage) -> Result<StatusResponse, ApiError> {
        ApiClient::record_completion(self, record).await
    }

    async fn efficiency_metrics(&self) -> Result<EfficiencyMetrics, ApiError> {
        ApiClient::efficiency_metrics(self).await
    }

    async fn efficiency_monthly(&self) -> Result<Vec<MonthlyEfficiency>, ApiError> {
        ApiClient::efficiency_monthly(self).await
    }

    async fn efficiency_analysis(&self) -> Result<EfficiencyAnalysis, ApiError> {
        ApiClient::efficiency_analysis(self).await
    }
}
