//! Server-computed dashboard and analytics payloads.
//!
//! All aggregates are calculated by the backend; these types only carry them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Activity, Opportunity, Stage, User};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesMetrics {
    #[serde(default)]
    pub total_opportunities: u32,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub weighted_forecast: f64,
    #[serde(default)]
    pub overdue_activities: u32,
    #[serde(default)]
    pub at_risk_opportunities: u32,
}

/// `GET /dashboard/sales`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesDashboard {
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub users: Vec<User>,
    pub metrics: SalesMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutiveMetrics {
    #[serde(default)]
    pub total_pipeline_value: f64,
    #[serde(default)]
    pub weighted_forecast: f64,
    #[serde(default)]
    pub total_deals: u32,
    #[serde(default)]
    pub won_deals: u32,
    #[serde(default)]
    pub lost_deals: u32,
    #[serde(default)]
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Bucket {
    pub count: u32,
    pub value: f64,
}

/// `GET /dashboard/executive`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutiveDashboard {
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub users: Vec<User>,
    pub metrics: ExecutiveMetrics,
    /// Keyed by stage id.
    #[serde(default)]
    pub by_stage: HashMap<String, Bucket>,
    /// Keyed by owner user id.
    #[serde(default)]
    pub by_owner: HashMap<String, Bucket>,
}

/// One row of `GET /analytics/pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageAnalytics {
    pub stage: String,
    pub stage_id: String,
    pub count: u32,
    pub value: f64,
    pub weighted: f64,
}

/// One row of `GET /analytics/engagement-types`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngagementAnalytics {
    #[serde(rename = "type")]
    pub engagement_type: String,
    pub total: u32,
    pub won: u32,
    pub value: f64,
    pub win_rate: f64,
}

/// One row of `GET /analytics/by-owner`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerAnalytics {
    /// Display name of the owner.
    pub owner: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub value: f64,
}

/// `GET /analytics/summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_pipeline_value: f64,
    #[serde(default)]
    pub weighted_forecast: f64,
    #[serde(default)]
    pub total_deals: u32,
    #[serde(default)]
    pub won_deals: u32,
    #[serde(default)]
    pub lost_deals: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub at_risk_deals: u32,
    #[serde(default)]
    pub overdue_activities: u32,
}

impl AnalyticsSummary {
    /// Average deal size, zero when there are no deals.
    pub fn average_deal(&self) -> f64 {
        if self.total_deals == 0 {
            0.0
        } else {
            self.total_pipeline_value / f64::from(self.total_deals)
        }
    }
}

/// Compact currency label, e.g. `$1.2M`, `$350K`, `$900`.
pub fn format_currency(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.0}K", abs / 1_000.0)
    } else {
        format!("{sign}${abs:.0}")
    }
}
