// Question answering and maintenance plan payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

/// Answer from the RAG question-answering endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QaAnswer {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub answer: String,
    #[serde(default)]
    pub part_diagram: Option<PartDiagram>,
}

/// Optional illustration of the part an answer is about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartDiagram {
    pub image_base64: Option<String>,
    pub part_name: Option<String>,
    pub verified: Option<bool>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanRequest<'a> {
    pub fault_description: &'a str,
}

/// The four sections produced by the planning pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePlan {
    #[serde(default)]
    pub tech_context: Option<String>,
    #[serde(default)]
    pub work_package: Option<String>,
    #[serde(default)]
    pub resource_plan: Option<String>,
    #[serde(default)]
    pub qa_review: Option<String>,
}

impl MaintenancePlan {
    /// A plan whose only content is an error message in the technical
    /// context slot.
    pub fn failed(message: impl Into<String>) -> Self {
        MaintenancePlan {
            tech_context: Some(message.into()),
            ..Default::default()
        }
    }

    /// Review input, if the three reviewed sections are all present.
    pub fn review_request(&self) -> Option<PlanReviewRequest> {
        Some(PlanReviewRequest {
            tech_context: self.tech_context.clone()?,
            work_package: self.work_package.clone()?,
            resource_plan: self.resource_plan.clone()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReviewRequest {
    pub tech_context: String,
    pub work_package: String,
    pub resource_plan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanReview {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub qa_review: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_answer_defaults_missing_answer() {
        let a: QaAnswer = serde_json::from_str(r#"{"part_diagram": null}"#).unwrap();
        assert_eq!(a.answer, "");
        assert!(a.part_diagram.is_none());

        let b: QaAnswer = serde_json::from_str(r#"{"answer": null}"#).unwrap();
        assert_eq!(b.answer, "");
    }

    #[test]
    fn review_request_needs_all_sections() {
        let mut plan = MaintenancePlan {
            tech_context: Some("ctx".into()),
            work_package: Some("wp".into()),
            resource_plan: None,
            qa_review: None,
        };
        assert!(plan.review_request().is_none());
        plan.resource_plan = Some("res".into());
        let req = plan.review_request().unwrap();
        assert_eq!(req.resource_plan, "res");
    }

    #[test]
    fn failed_plan_puts_message_in_context() {
        let plan = MaintenancePlan::failed("Plan request failed");
        assert_eq!(plan.tech_context.as_deref(), Some("Plan request failed"));
        assert!(plan.work_package.is_none());
    }
}
