//! Create and edit forms for CRM records.
//!
//! Each form holds the raw text the user typed and turns it into a request
//! payload, rejecting missing required fields before anything is sent. Blank
//! optional fields are dropped rather than sent as empty strings. Edit forms
//! start from the stored record (`From<&Record>`) and reuse the same checks.

use api::{
    Activity, ActivityInput, ActivityUpdate, ApiError, AtRiskUpdate, Contact, ContactInput, Opportunity,
    OpportunityInput, OpportunityUpdate, Organization, OrganizationInput,
};

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `YYYY-MM-DD` part of an ISO timestamp, for date inputs.
fn date_part(value: &str) -> String {
    value.split('T').next().unwrap_or_default().to_string()
}

fn parse_value(value: &str) -> Result<f64, ApiError> {
    let value = value.trim().replace(',', "");
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ApiError::validation("Estimated value must be a positive number")),
    }
}

fn parse_confidence(value: &str) -> Result<u8, ApiError> {
    match value.trim().parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(ApiError::validation("Confidence must be between 0 and 100")),
    }
}

pub const TIERS: [&str; 3] = ["Target", "Active", "Strategic"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationForm {
    pub name: String,
    pub industry: String,
    pub region: String,
    pub strategic_tier: String,
    pub notes: String,
}

impl Default for OrganizationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            industry: String::new(),
            region: String::new(),
            strategic_tier: "Active".to_string(),
            notes: String::new(),
        }
    }
}

impl From<&Organization> for OrganizationForm {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            industry: org.industry.clone().unwrap_or_default(),
            region: org.region.clone().unwrap_or_default(),
            strategic_tier: org.strategic_tier.clone(),
            notes: org.notes.clone().unwrap_or_default(),
        }
    }
}

impl OrganizationForm {
    pub fn input(&self) -> Result<OrganizationInput, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Organization name is required"));
        }
        Ok(OrganizationInput {
            name: name.to_string(),
            industry: optional(&self.industry),
            region: optional(&self.region),
            strategic_tier: optional(&self.strategic_tier).unwrap_or_else(|| "Active".to_string()),
            notes: optional(&self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub org_id: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub buying_role: String,
}

impl From<&Contact> for ContactForm {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            org_id: contact.org_id.clone(),
            title: contact.title.clone().unwrap_or_default(),
            email: contact.email.clone().unwrap_or_default(),
            phone: contact.phone.clone().unwrap_or_default(),
            buying_role: contact.buying_role.clone().unwrap_or_default(),
        }
    }
}

impl ContactForm {
    pub fn input(&self) -> Result<ContactInput, ApiError> {
        let name = self.name.trim();
        let org_id = self.org_id.trim();
        if name.is_empty() || org_id.is_empty() {
            return Err(ApiError::validation("Name and Organization are required"));
        }
        Ok(ContactInput {
            name: name.to_string(),
            org_id: org_id.to_string(),
            title: optional(&self.title),
            email: optional(&self.email),
            phone: optional(&self.phone),
            buying_role: optional(&self.buying_role),
        })
    }
}

pub const ACTIVITY_TYPES: [&str; 6] = ["Call", "Meeting", "Demo", "Workshop", "Follow-up", "Exec Readout"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityForm {
    pub activity_type: String,
    pub opp_id: String,
    /// `YYYY-MM-DD` from a date input.
    pub due_date: String,
    pub notes: String,
}

impl Default for ActivityForm {
    fn default() -> Self {
        Self {
            activity_type: ACTIVITY_TYPES[0].to_string(),
            opp_id: String::new(),
            due_date: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&Activity> for ActivityForm {
    fn from(activity: &Activity) -> Self {
        Self {
            activity_type: activity.activity_type.clone(),
            opp_id: activity.opp_id.clone(),
            due_date: date_part(&activity.due_date),
            notes: activity.notes.clone().unwrap_or_default(),
        }
    }
}

impl ActivityForm {
    /// Reschedule or re-annotate an existing activity. Clearing the notes
    /// sends an empty string so the stored notes are removed too.
    pub fn update(&self) -> Result<ActivityUpdate, ApiError> {
        let due_date = self.due_date.trim();
        if due_date.is_empty() {
            return Err(ApiError::validation("Due date is required"));
        }
        Ok(ActivityUpdate {
            status: None,
            due_date: Some(due_date.to_string()),
            notes: Some(self.notes.trim().to_string()),
        })
    }

    pub fn input(&self) -> Result<ActivityInput, ApiError> {
        let due_date = self.due_date.trim();
        if due_date.is_empty() {
            return Err(ApiError::validation("Due date is required"));
        }
        let opp_id = self.opp_id.trim();
        if opp_id.is_empty() {
            return Err(ApiError::validation("Please select an opportunity"));
        }
        Ok(ActivityInput {
            activity_type: self.activity_type.clone(),
            opp_id: opp_id.to_string(),
            due_date: due_date.to_string(),
            notes: optional(&self.notes),
        })
    }
}

pub const ENGAGEMENT_TYPES: [&str; 6] = [
    "Advisory",
    "Strategy",
    "AI Enablement",
    "Data Modernization",
    "Platform / Architecture",
    "Transformation",
];

/// New opportunity, created from the pipeline board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityForm {
    pub name: String,
    pub org_id: String,
    pub owner_id: String,
    pub engagement_type: String,
    pub stage_id: String,
    pub estimated_value: String,
    pub confidence_level: String,
    pub target_close_date: String,
}

impl OpportunityForm {
    /// A blank form opening in `stage_id`, owned by `owner_id` until changed.
    pub fn new(stage_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            org_id: String::new(),
            owner_id: owner_id.into(),
            engagement_type: ENGAGEMENT_TYPES[0].to_string(),
            stage_id: stage_id.into(),
            estimated_value: String::new(),
            confidence_level: "50".to_string(),
            target_close_date: String::new(),
        }
    }

    pub fn input(&self, pipeline_id: &str) -> Result<OpportunityInput, ApiError> {
        let name = self.name.trim();
        let org_id = self.org_id.trim();
        if name.is_empty() || org_id.is_empty() {
            return Err(ApiError::validation("Please fill in required fields"));
        }
        let Some(owner_id) = optional(&self.owner_id) else {
            return Err(ApiError::validation("Please select an owner"));
        };
        let Some(stage_id) = optional(&self.stage_id) else {
            return Err(ApiError::validation("Please select a stage"));
        };
        Ok(OpportunityInput {
            name: name.to_string(),
            org_id: org_id.to_string(),
            engagement_type: self.engagement_type.clone(),
            estimated_value: parse_value(&self.estimated_value)?,
            confidence_level: parse_confidence(&self.confidence_level)?,
            pipeline_id: pipeline_id.to_string(),
            stage_id,
            owner_id: Some(owner_id),
            primary_contact_id: None,
            target_close_date: optional(&self.target_close_date),
        })
    }
}

/// Edit form for the opportunity detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityEditForm {
    pub name: String,
    pub engagement_type: String,
    pub stage_id: String,
    pub owner_id: String,
    pub estimated_value: String,
    pub confidence_level: String,
    pub target_close_date: String,
    pub notes: String,
    pub value_hypothesis: String,
}

impl From<&Opportunity> for OpportunityEditForm {
    fn from(opp: &Opportunity) -> Self {
        Self {
            name: opp.name.clone(),
            engagement_type: opp.engagement_type.clone(),
            stage_id: opp.stage_id.clone(),
            owner_id: opp.owner_id.clone(),
            estimated_value: format!("{}", opp.estimated_value),
            confidence_level: opp.confidence_level.to_string(),
            target_close_date: opp.target_close_date.as_deref().map(date_part).unwrap_or_default(),
            notes: opp.notes.clone().unwrap_or_default(),
            value_hypothesis: opp.value_hypothesis.clone().unwrap_or_default(),
        }
    }
}

impl OpportunityEditForm {
    /// Free-text fields are always sent so that clearing them sticks.
    pub fn update(&self) -> Result<OpportunityUpdate, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Opportunity name is required"));
        }
        Ok(OpportunityUpdate {
            name: Some(name.to_string()),
            stage_id: optional(&self.stage_id),
            engagement_type: optional(&self.engagement_type),
            estimated_value: Some(parse_value(&self.estimated_value)?),
            confidence_level: Some(parse_confidence(&self.confidence_level)?),
            owner_id: optional(&self.owner_id),
            target_close_date: optional(&self.target_close_date),
            value_hypothesis: Some(self.value_hypothesis.trim().to_string()),
            notes: Some(self.notes.trim().to_string()),
        })
    }
}

/// Body for flagging an opportunity at risk. A reason is mandatory.
pub fn flag_at_risk(reason: &str) -> Result<AtRiskUpdate, ApiError> {
    let Some(reason) = optional(reason) else {
        return Err(ApiError::validation("Please provide a reason"));
    };
    Ok(AtRiskUpdate {
        is_at_risk: true,
        at_risk_reason: Some(reason),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_requires_name() {
        let form = OrganizationForm {
            name: "  ".to_string(),
            ..OrganizationForm::default()
        };
        assert!(form.input().is_err());

        let form = OrganizationForm {
            name: " Acme ".to_string(),
            region: "".to_string(),
            industry: "Retail".to_string(),
            ..OrganizationForm::default()
        };
        let input = form.input().unwrap();
        assert_eq!(input.name, "Acme");
        assert_eq!(input.region, None);
        assert_eq!(input.industry.as_deref(), Some("Retail"));
        assert_eq!(input.strategic_tier, "Active");
    }

    #[test]
    fn test_contact_requires_name_and_org() {
        let form = ContactForm {
            name: "Bo".to_string(),
            ..ContactForm::default()
        };
        assert_eq!(
            form.input().unwrap_err(),
            ApiError::validation("Name and Organization are required")
        );

        let form = ContactForm {
            name: "Bo".to_string(),
            org_id: "org_1".to_string(),
            email: "bo@example.com".to_string(),
            ..ContactForm::default()
        };
        let input = form.input().unwrap();
        assert_eq!(input.email.as_deref(), Some("bo@example.com"));
        assert_eq!(input.title, None);
    }

    #[test]
    fn test_activity_requires_due_date_first() {
        let form = ActivityForm::default();
        assert_eq!(
            form.input().unwrap_err(),
            ApiError::validation("Due date is required")
        );

        let form = ActivityForm {
            due_date: "2026-11-02".to_string(),
            opp_id: "opp_1".to_string(),
            ..ActivityForm::default()
        };
        assert_eq!(form.input().unwrap().activity_type, "Call");
    }

    fn opportunity() -> Opportunity {
        serde_json::from_value(serde_json::json!({
            "opp_id": "opp_1", "name": "Data platform", "org_id": "org_1",
            "engagement_type": "Strategy", "owner_id": "u1",
            "pipeline_id": "p1", "stage_id": "s2",
            "estimated_value": 250000.0, "confidence_level": 60,
            "target_close_date": "2026-12-01T00:00:00Z",
            "notes": "Renewal"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_opportunity_checks_required_fields_then_owner() {
        let mut form = OpportunityForm::new("s1", "");
        form.name = "Data platform".to_string();
        assert_eq!(
            form.input("p1").unwrap_err(),
            ApiError::validation("Please fill in required fields")
        );

        form.org_id = "org_1".to_string();
        assert_eq!(
            form.input("p1").unwrap_err(),
            ApiError::validation("Please select an owner")
        );

        form.owner_id = "u2".to_string();
        form.estimated_value = "120,000".to_string();
        let input = form.input("p1").unwrap();
        assert_eq!(input.pipeline_id, "p1");
        assert_eq!(input.stage_id, "s1");
        assert_eq!(input.owner_id.as_deref(), Some("u2"));
        assert_eq!(input.estimated_value, 120_000.0);
        assert_eq!(input.confidence_level, 50);
        assert_eq!(input.engagement_type, "Advisory");
        assert_eq!(input.target_close_date, None);
    }

    #[test]
    fn test_new_opportunity_rejects_bad_numbers() {
        let mut form = OpportunityForm::new("s1", "u1");
        form.name = "Deal".to_string();
        form.org_id = "org_1".to_string();
        form.confidence_level = "140".to_string();
        assert_eq!(
            form.input("p1").unwrap_err(),
            ApiError::validation("Confidence must be between 0 and 100")
        );

        form.confidence_level = "40".to_string();
        form.estimated_value = "lots".to_string();
        assert!(form.input("p1").is_err());
    }

    #[test]
    fn test_opportunity_edit_starts_from_record() {
        let form = OpportunityEditForm::from(&opportunity());
        assert_eq!(form.target_close_date, "2026-12-01");
        assert_eq!(form.estimated_value, "250000");

        let update = form.update().unwrap();
        assert_eq!(update.name.as_deref(), Some("Data platform"));
        assert_eq!(update.estimated_value, Some(250_000.0));
        assert_eq!(update.confidence_level, Some(60));
        assert_eq!(update.target_close_date.as_deref(), Some("2026-12-01"));
        assert_eq!(update.value_hypothesis.as_deref(), Some(""));
    }

    #[test]
    fn test_opportunity_edit_requires_name() {
        let mut form = OpportunityEditForm::from(&opportunity());
        form.name = " ".to_string();
        assert_eq!(
            form.update().unwrap_err(),
            ApiError::validation("Opportunity name is required")
        );
    }

    #[test]
    fn test_at_risk_needs_reason() {
        assert_eq!(
            flag_at_risk("  ").unwrap_err(),
            ApiError::validation("Please provide a reason")
        );
        let update = flag_at_risk(" Budget freeze ").unwrap();
        assert!(update.is_at_risk);
        assert_eq!(update.at_risk_reason.as_deref(), Some("Budget freeze"));
    }

    #[test]
    fn test_edit_forms_round_trip_stored_records() {
        let org: Organization = serde_json::from_value(serde_json::json!({
            "org_id": "org_1", "name": "Acme", "strategic_tier": "Strategic", "region": "EMEA"
        }))
        .unwrap();
        let input = OrganizationForm::from(&org).input().unwrap();
        assert_eq!(input.strategic_tier, "Strategic");
        assert_eq!(input.region.as_deref(), Some("EMEA"));
        assert_eq!(input.notes, None);

        let contact: Contact = serde_json::from_value(serde_json::json!({
            "contact_id": "c1", "name": "Lee", "org_id": "org_1", "email": "lee@example.com"
        }))
        .unwrap();
        let input = ContactForm::from(&contact).input().unwrap();
        assert_eq!(input.org_id, "org_1");
        assert_eq!(input.email.as_deref(), Some("lee@example.com"));
    }

    #[test]
    fn test_activity_update_keeps_cleared_notes() {
        let activity: Activity = serde_json::from_value(serde_json::json!({
            "activity_id": "a1", "activity_type": "Call", "opp_id": "opp_1",
            "due_date": "2026-11-02T09:00:00Z", "owner_id": "u1", "notes": "Agenda"
        }))
        .unwrap();
        let mut form = ActivityForm::from(&activity);
        assert_eq!(form.due_date, "2026-11-02");

        form.notes.clear();
        let update = form.update().unwrap();
        assert_eq!(update.due_date.as_deref(), Some("2026-11-02"));
        assert_eq!(update.notes.as_deref(), Some(""));
        assert_eq!(update.status, None);

        form.due_date.clear();
        assert!(form.update().is_err());
    }
}
