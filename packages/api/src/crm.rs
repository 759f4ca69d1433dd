//! CRM resource endpoints: conventional JSON CRUD plus the dashboard and
//! analytics reads.

use crate::client::with_query;
use crate::models::*;
use crate::transport::Transport;
use crate::{ApiClient, ApiError};

/// Optional filters accepted by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub org_id: Option<String>,
    pub opp_id: Option<String>,
    pub pipeline_id: Option<String>,
    pub owner_id: Option<String>,
    pub status: Option<String>,
}

impl ListFilter {
    pub fn org(org_id: impl Into<String>) -> Self {
        Self {
            org_id: Some(org_id.into()),
            ..Self::default()
        }
    }

    pub fn opportunity(opp_id: impl Into<String>) -> Self {
        Self {
            opp_id: Some(opp_id.into()),
            ..Self::default()
        }
    }

    pub fn pipeline(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: Some(pipeline_id.into()),
            ..Self::default()
        }
    }

    fn apply(&self, path: &str) -> String {
        with_query(
            path,
            &[
                ("org_id", self.org_id.as_deref()),
                ("opp_id", self.opp_id.as_deref()),
                ("pipeline_id", self.pipeline_id.as_deref()),
                ("owner_id", self.owner_id.as_deref()),
                ("status", self.status.as_deref()),
            ],
        )
    }
}

fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}

impl<T: Transport> ApiClient<T> {
    // Organizations

    pub async fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get("/organizations").await
    }

    pub async fn get_organization(&self, org_id: &str) -> Result<Organization, ApiError> {
        self.get(&format!("/organizations/{}", segment(org_id))).await
    }

    pub async fn create_organization(&self, input: &OrganizationInput) -> Result<Organization, ApiError> {
        self.post("/organizations", input).await
    }

    pub async fn update_organization(
        &self,
        org_id: &str,
        input: &OrganizationInput,
    ) -> Result<Organization, ApiError> {
        self.put(&format!("/organizations/{}", segment(org_id)), input).await
    }

    pub async fn delete_organization(&self, org_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/organizations/{}", segment(org_id))).await
    }

    // Contacts

    pub async fn list_contacts(&self, filter: &ListFilter) -> Result<Vec<Contact>, ApiError> {
        self.get(&filter.apply("/contacts")).await
    }

    pub async fn get_contact(&self, contact_id: &str) -> Result<Contact, ApiError> {
        self.get(&format!("/contacts/{}", segment(contact_id))).await
    }

    pub async fn create_contact(&self, input: &ContactInput) -> Result<Contact, ApiError> {
        self.post("/contacts", input).await
    }

    pub async fn update_contact(&self, contact_id: &str, input: &ContactInput) -> Result<Contact, ApiError> {
        self.put(&format!("/contacts/{}", segment(contact_id)), input).await
    }

    pub async fn delete_contact(&self, contact_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/contacts/{}", segment(contact_id))).await
    }

    // Pipelines

    pub async fn list_pipelines(&self) -> Result<Vec<Pipeline>, ApiError> {
        self.get("/pipelines").await
    }

    pub async fn list_stages(&self, pipeline_id: &str) -> Result<Vec<Stage>, ApiError> {
        self.get(&format!("/pipelines/{}/stages", segment(pipeline_id))).await
    }

    // Opportunities

    pub async fn list_opportunities(&self, filter: &ListFilter) -> Result<Vec<Opportunity>, ApiError> {
        self.get(&filter.apply("/opportunities")).await
    }

    pub async fn get_opportunity(&self, opp_id: &str) -> Result<Opportunity, ApiError> {
        self.get(&format!("/opportunities/{}", segment(opp_id))).await
    }

    pub async fn create_opportunity(&self, input: &OpportunityInput) -> Result<Opportunity, ApiError> {
        self.post("/opportunities", input).await
    }

    pub async fn update_opportunity(
        &self,
        opp_id: &str,
        update: &OpportunityUpdate,
    ) -> Result<Opportunity, ApiError> {
        self.put(&format!("/opportunities/{}", segment(opp_id)), update).await
    }

    /// Flag or clear the at-risk marker. The response is the updated record.
    pub async fn set_at_risk(&self, opp_id: &str, update: &AtRiskUpdate) -> Result<Opportunity, ApiError> {
        self.put(&format!("/opportunities/{}/at-risk", segment(opp_id)), update)
            .await
    }

    /// Move an opportunity to another stage of its pipeline.
    pub async fn move_opportunity(&self, opp_id: &str, stage_id: &str) -> Result<Opportunity, ApiError> {
        self.update_opportunity(opp_id, &OpportunityUpdate::stage(stage_id)).await
    }

    pub async fn delete_opportunity(&self, opp_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/opportunities/{}", segment(opp_id))).await
    }

    // Activities

    pub async fn list_activities(&self, filter: &ListFilter) -> Result<Vec<Activity>, ApiError> {
        self.get(&filter.apply("/activities")).await
    }

    pub async fn create_activity(&self, input: &ActivityInput) -> Result<Activity, ApiError> {
        self.post("/activities", input).await
    }

    pub async fn update_activity(&self, activity_id: &str, update: &ActivityUpdate) -> Result<Activity, ApiError> {
        self.put(&format!("/activities/{}", segment(activity_id)), update).await
    }

    pub async fn complete_activity(&self, activity_id: &str) -> Result<Activity, ApiError> {
        let update = ActivityUpdate {
            status: Some("Completed".to_string()),
            ..ActivityUpdate::default()
        };
        self.update_activity(activity_id, &update).await
    }

    pub async fn delete_activity(&self, activity_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/activities/{}", segment(activity_id))).await
    }

    // Dashboards and analytics

    pub async fn sales_dashboard(&self) -> Result<SalesDashboard, ApiError> {
        self.get("/dashboard/sales").await
    }

    pub async fn executive_dashboard(&self) -> Result<ExecutiveDashboard, ApiError> {
        self.get("/dashboard/executive").await
    }

    // `owner_id` narrows an analytics read to one owner's deals; `None` is everyone.

    pub async fn pipeline_analytics(&self, owner_id: Option<&str>) -> Result<Vec<StageAnalytics>, ApiError> {
        self.get(&with_query("/analytics/pipeline", &[("owner_id", owner_id)]))
            .await
    }

    pub async fn engagement_analytics(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<EngagementAnalytics>, ApiError> {
        self.get(&with_query("/analytics/engagement-types", &[("owner_id", owner_id)]))
            .await
    }

    pub async fn analytics_summary(&self, owner_id: Option<&str>) -> Result<AnalyticsSummary, ApiError> {
        self.get(&with_query("/analytics/summary", &[("owner_id", owner_id)]))
            .await
    }

    /// Pipeline value per owner, always across the whole team.
    pub async fn owner_analytics(&self) -> Result<Vec<OwnerAnalytics>, ApiError> {
        self.get("/analytics/by-owner").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ApiResponse, Method};
    use crate::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_contacts_filters_by_org() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Get,
            "/contacts",
            ApiResponse::json(
                200,
                json!([{ "contact_id": "c1", "name": "Lee", "org_id": "org_1" }]),
            ),
        );
        let client = ApiClient::new(mock.clone());

        let contacts = client.list_contacts(&ListFilter::org("org_1")).await.unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(mock.requests()[0].path, "/contacts?org_id=org_1");
    }

    #[tokio::test]
    async fn test_move_opportunity_puts_stage_only() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Put,
            "/opportunities/opp_1",
            ApiResponse::json(
                200,
                json!({
                    "opp_id": "opp_1", "name": "Deal", "org_id": "org_1",
                    "engagement_type": "Advisory", "owner_id": "u1",
                    "pipeline_id": "p1", "stage_id": "s2"
                }),
            ),
        );
        let client = ApiClient::new(mock.clone());

        let opp = client.move_opportunity("opp_1", "s2").await.unwrap();

        assert_eq!(opp.stage_id, "s2");
        assert_eq!(mock.requests()[0].body, Some(json!({ "stage_id": "s2" })));
    }

    #[tokio::test]
    async fn test_ids_are_escaped_in_paths() {
        let mock = MockTransport::new();
        let client = ApiClient::new(mock.clone());

        let err = client.get_organization("a/b").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(mock.requests()[0].path, "/organizations/a%2Fb");
    }

    fn opportunity_json(stage_id: &str, at_risk: bool) -> serde_json::Value {
        json!({
            "opp_id": "opp_1", "name": "Deal", "org_id": "org_1",
            "engagement_type": "Advisory", "owner_id": "u1",
            "pipeline_id": "p1", "stage_id": stage_id,
            "is_at_risk": at_risk,
            "at_risk_reason": if at_risk { json!("Budget freeze") } else { json!(null) }
        })
    }

    #[tokio::test]
    async fn test_set_at_risk_sends_reason() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Put,
            "/opportunities/opp_1/at-risk",
            ApiResponse::json(200, opportunity_json("s1", true)),
        );
        let client = ApiClient::new(mock.clone());

        let update = AtRiskUpdate {
            is_at_risk: true,
            at_risk_reason: Some("Budget freeze".to_string()),
        };
        let opp = client.set_at_risk("opp_1", &update).await.unwrap();

        assert!(opp.is_at_risk);
        assert_eq!(opp.at_risk_reason.as_deref(), Some("Budget freeze"));
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({ "is_at_risk": true, "at_risk_reason": "Budget freeze" }))
        );
    }

    #[tokio::test]
    async fn test_clearing_at_risk_sends_null_reason() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Put,
            "/opportunities/opp_1/at-risk",
            ApiResponse::json(200, opportunity_json("s1", false)),
        );
        let client = ApiClient::new(mock.clone());

        let opp = client.set_at_risk("opp_1", &AtRiskUpdate::clear()).await.unwrap();

        assert!(!opp.is_at_risk);
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({ "is_at_risk": false, "at_risk_reason": null }))
        );
    }

    #[tokio::test]
    async fn test_update_opportunity_sends_only_edited_fields() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Put,
            "/opportunities/opp_1",
            ApiResponse::json(200, opportunity_json("s1", false)),
        );
        let client = ApiClient::new(mock.clone());

        let update = OpportunityUpdate {
            name: Some("Deal".to_string()),
            confidence_level: Some(70),
            ..OpportunityUpdate::default()
        };
        client.update_opportunity("opp_1", &update).await.unwrap();

        assert_eq!(
            mock.requests()[0].body,
            Some(json!({ "name": "Deal", "confidence_level": 70 }))
        );
    }

    #[tokio::test]
    async fn test_analytics_reads_scope_to_owner() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/analytics/pipeline", ApiResponse::json(200, json!([])));
        mock.respond(
            Method::Get,
            "/analytics/summary",
            ApiResponse::json(200, json!({ "total_deals": 4, "total_pipeline_value": 200000.0 })),
        );
        mock.respond(
            Method::Get,
            "/analytics/by-owner",
            ApiResponse::json(200, json!([{ "owner": "Ana", "value": 120000.0, "count": 3 }])),
        );
        let client = ApiClient::new(mock.clone());

        client.pipeline_analytics(Some("u1")).await.unwrap();
        let summary = client.analytics_summary(None).await.unwrap();
        let owners = client.owner_analytics().await.unwrap();

        let paths: Vec<String> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/analytics/pipeline?owner_id=u1", "/analytics/summary", "/analytics/by-owner"]
        );
        assert_eq!(summary.average_deal(), 50_000.0);
        assert_eq!(summary.won_deals, 0);
        assert_eq!(owners[0].owner, "Ana");
        assert_eq!(owners[0].owner_id, None);
    }

    #[tokio::test]
    async fn test_complete_activity_sets_status() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Put,
            "/activities/act_1",
            ApiResponse::json(
                200,
                json!({
                    "activity_id": "act_1", "activity_type": "Call", "opp_id": "opp_1",
                    "due_date": "2026-01-01T00:00:00Z", "owner_id": "u1", "status": "Completed"
                }),
            ),
        );
        let client = ApiClient::new(mock.clone());

        let activity = client.complete_activity("act_1").await.unwrap();

        assert!(activity.is_completed());
        assert_eq!(mock.requests()[0].body, Some(json!({ "status": "Completed" })));
    }
}
