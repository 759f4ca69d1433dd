//! Records for organizations, contacts, opportunities, activities and pipelines.
//!
//! Timestamps stay ISO-8601 strings as sent by the backend; the frontend only
//! displays them. Create/update payloads are separate structs so optional
//! fields are simply omitted from the request body.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub org_id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// `Target`, `Active` or `Strategic`.
    #[serde(default = "default_tier")]
    pub strategic_tier: String,
    #[serde(default)]
    pub primary_exec_sponsor: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_tier() -> String {
    "Active".to_string()
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrganizationInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub strategic_tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub contact_id: String,
    pub name: String,
    pub org_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Business function, e.g. `IT`, `Data`, `AI`, `Finance`.
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// `Decision Maker`, `Influencer`, `Champion`, ...
    #[serde(default)]
    pub buying_role: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ContactInput {
    pub name: String,
    pub org_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buying_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Opportunity {
    pub opp_id: String,
    pub name: String,
    pub org_id: String,
    #[serde(default)]
    pub primary_contact_id: Option<String>,
    pub engagement_type: String,
    #[serde(default)]
    pub estimated_value: f64,
    /// 0-100.
    #[serde(default = "default_confidence")]
    pub confidence_level: u8,
    pub owner_id: String,
    pub pipeline_id: String,
    pub stage_id: String,
    #[serde(default)]
    pub target_close_date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub value_hypothesis: Option<String>,
    #[serde(default)]
    pub is_at_risk: bool,
    #[serde(default)]
    pub at_risk_reason: Option<String>,
    #[serde(default)]
    pub stage_entered_at: Option<String>,
}

fn default_confidence() -> u8 {
    50
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OpportunityInput {
    pub name: String,
    pub org_id: String,
    pub engagement_type: String,
    pub estimated_value: f64,
    pub confidence_level: u8,
    pub pipeline_id: String,
    pub stage_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_close_date: Option<String>,
}

/// Partial update for `PUT /opportunities/:id`; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OpportunityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_close_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_hypothesis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OpportunityUpdate {
    pub fn stage(stage_id: impl Into<String>) -> Self {
        Self {
            stage_id: Some(stage_id.into()),
            ..Self::default()
        }
    }
}

/// Body of `PUT /opportunities/:id/at-risk`. Clearing sends a `null` reason.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AtRiskUpdate {
    pub is_at_risk: bool,
    pub at_risk_reason: Option<String>,
}

impl AtRiskUpdate {
    pub fn clear() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub activity_id: String,
    /// `Call`, `Meeting`, `Demo`, `Workshop`, `Follow-up`, `Exec Readout`.
    pub activity_type: String,
    pub opp_id: String,
    pub due_date: String,
    pub owner_id: String,
    /// `Planned`, `Completed` or `Overdue`.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_status() -> String {
    "Planned".to_string()
}

impl Activity {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ActivityInput {
    pub activity_type: String,
    pub opp_id: String,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ActivityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pipeline {
    pub pipeline_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stage {
    pub stage_id: String,
    pub pipeline_id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub win_probability: u8,
}

/// The default pipeline, or the first one if none is flagged.
pub fn default_pipeline(pipelines: &[Pipeline]) -> Option<&Pipeline> {
    pipelines
        .iter()
        .find(|p| p.is_default)
        .or_else(|| pipelines.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opportunity_defaults() {
        let opp: Opportunity = serde_json::from_value(json!({
            "opp_id": "opp_1",
            "name": "Data platform",
            "org_id": "org_1",
            "engagement_type": "Advisory",
            "owner_id": "user_1",
            "pipeline_id": "pipe_1",
            "stage_id": "stage_1"
        }))
        .unwrap();
        assert_eq!(opp.confidence_level, 50);
        assert_eq!(opp.estimated_value, 0.0);
        assert!(!opp.is_at_risk);
    }

    #[test]
    fn test_stage_update_serializes_only_stage() {
        let body = serde_json::to_value(OpportunityUpdate::stage("stage_2")).unwrap();
        assert_eq!(body, json!({ "stage_id": "stage_2" }));
    }

    #[test]
    fn test_default_pipeline_prefers_flag() {
        let pipelines = vec![
            Pipeline {
                pipeline_id: "a".to_string(),
                name: "A".to_string(),
                description: None,
                is_default: false,
            },
            Pipeline {
                pipeline_id: "b".to_string(),
                name: "B".to_string(),
                description: None,
                is_default: true,
            },
        ];
        assert_eq!(default_pipeline(&pipelines).map(|p| p.pipeline_id.as_str()), Some("b"));
        assert!(default_pipeline(&[]).is_none());
    }
}
