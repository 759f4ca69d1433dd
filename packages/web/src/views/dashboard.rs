use std::collections::HashMap;

use api::{format_currency, Bucket, ExecutiveDashboard, Opportunity, Organization, SalesDashboard};
use dioxus::prelude::*;
use store::OwnerNames;
use ui::{use_session_state, Spinner};

use super::{use_loader, PageHeader};
use crate::Route;

#[component]
pub fn Dashboard() -> Element {
    let state = use_session_state();
    let data = use_loader("Failed to load dashboard", |client| async move {
        futures::try_join!(client.sales_dashboard(), client.list_organizations())
    });

    let greeting = state()
        .user()
        .map(|u| format!("Welcome back, {}", u.display_name()))
        .unwrap_or_else(|| "Welcome back".to_string());

    let loaded = data.read().clone();
    let Some(Some((dashboard, organizations))) = loaded else {
        return rsx! {
            PageHeader { title: greeting }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    rsx! {
        PageHeader { title: greeting, subtitle: "Your pipeline at a glance".to_string() }
        SalesMetricCards { dashboard: dashboard.clone() }
        div {
            class: "dashboard-grid",
            AtRiskList { dashboard: dashboard.clone(), organizations: organizations.clone() }
            UpcomingActivities { dashboard }
        }
    }
}

#[component]
fn SalesMetricCards(dashboard: SalesDashboard) -> Element {
    let m = &dashboard.metrics;
    rsx! {
        div {
            class: "metric-cards",
            MetricCard { label: "Open opportunities", value: m.total_opportunities.to_string() }
            MetricCard { label: "Pipeline value", value: format_currency(m.total_value) }
            MetricCard { label: "Weighted forecast", value: format_currency(m.weighted_forecast) }
            MetricCard { label: "Overdue activities", value: m.overdue_activities.to_string() }
            MetricCard { label: "At risk", value: m.at_risk_opportunities.to_string() }
        }
    }
}

#[component]
pub(crate) fn MetricCard(label: String, value: String) -> Element {
    rsx! {
        div {
            class: "metric-card",
            span { class: "metric-label", "{label}" }
            span { class: "metric-value", "{value}" }
        }
    }
}

#[component]
fn AtRiskList(dashboard: SalesDashboard, organizations: Vec<Organization>) -> Element {
    // The sales dashboard ships its own copy of the user directory.
    let owners = OwnerNames::new(dashboard.users.clone());
    let org_names: HashMap<&str, &str> = organizations
        .iter()
        .map(|o| (o.org_id.as_str(), o.name.as_str()))
        .collect();
    let at_risk: Vec<(&Opportunity, &str)> = dashboard
        .opportunities
        .iter()
        .filter(|o| o.is_at_risk)
        .map(|o| (o, org_names.get(o.org_id.as_str()).copied().unwrap_or_default()))
        .collect();

    rsx! {
        section {
            class: "card",
            h2 { "At-risk opportunities" }
            if at_risk.is_empty() {
                p { class: "empty", "Nothing at risk." }
            }
            ul {
                class: "list",
                for (opp, org_name) in at_risk {
                    li {
                        key: "{opp.opp_id}",
                        Link {
                            to: Route::OpportunityDetail { opp_id: opp.opp_id.clone() },
                            "{opp.name}"
                        }
                        span { class: "muted", " {org_name} · {owners.name(&opp.owner_id)}" }
                        span { class: "amount", "{format_currency(opp.estimated_value)}" }
                        if let Some(reason) = opp.at_risk_reason.clone() {
                            p { class: "notes", "{reason}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn UpcomingActivities(dashboard: SalesDashboard) -> Element {
    let mut upcoming: Vec<_> = dashboard
        .activities
        .iter()
        .filter(|a| !a.is_completed())
        .collect();
    upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    upcoming.truncate(8);

    rsx! {
        section {
            class: "card",
            h2 { "Upcoming activities" }
            if upcoming.is_empty() {
                p { class: "empty", "No planned activities." }
            }
            ul {
                class: "list",
                for activity in upcoming {
                    li {
                        key: "{activity.activity_id}",
                        span { class: "badge", "{activity.activity_type}" }
                        Link {
                            to: Route::OpportunityDetail { opp_id: activity.opp_id.clone() },
                            {activity.notes.clone().unwrap_or_else(|| "Open opportunity".to_string())}
                        }
                        span { class: "muted", "{activity.due_date}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Executive() -> Element {
    let data = use_loader("Failed to load dashboard", |client| async move {
        client.executive_dashboard().await
    });

    let loaded = data.read().clone();
    let Some(Some(dashboard)) = loaded else {
        return rsx! {
            PageHeader { title: "Executive dashboard" }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    rsx! {
        PageHeader { title: "Executive dashboard", subtitle: "Company-wide pipeline".to_string() }
        ExecutiveView { dashboard }
    }
}

#[component]
fn ExecutiveView(dashboard: ExecutiveDashboard) -> Element {
    let m = &dashboard.metrics;
    let mut stages = dashboard.stages.clone();
    stages.sort_by_key(|s| s.order);
    let stage_rows: Vec<(String, Bucket)> = stages
        .iter()
        .map(|s| {
            let bucket = dashboard.by_stage.get(&s.stage_id).cloned().unwrap_or_default();
            (s.name.clone(), bucket)
        })
        .collect();
    let mut owner_rows: Vec<(String, Bucket)> = dashboard
        .by_owner
        .iter()
        .map(|(owner_id, bucket)| {
            let name = dashboard
                .users
                .iter()
                .find(|u| &u.user_id == owner_id)
                .map_or_else(|| owner_id.clone(), |u| u.display_name().to_string());
            (name, bucket.clone())
        })
        .collect();
    owner_rows.sort_by(|a, b| b.1.value.total_cmp(&a.1.value));

    rsx! {
        div {
            class: "metric-cards",
            MetricCard { label: "Total pipeline", value: format_currency(m.total_pipeline_value) }
            MetricCard { label: "Weighted forecast", value: format_currency(m.weighted_forecast) }
            MetricCard { label: "Deals", value: m.total_deals.to_string() }
            MetricCard { label: "Won / lost", value: format!("{} / {}", m.won_deals, m.lost_deals) }
            MetricCard { label: "Win rate", value: format!("{:.0}%", m.win_rate) }
        }
        div {
            class: "dashboard-grid",
            BucketTable { title: "By stage", rows: stage_rows }
            BucketTable { title: "By owner", rows: owner_rows }
        }
    }
}

#[component]
fn BucketTable(title: String, rows: Vec<(String, Bucket)>) -> Element {
    rsx! {
        section {
            class: "card",
            h2 { "{title}" }
            table {
                class: "table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Deals" }
                        th { "Value" }
                    }
                }
                tbody {
                    for (name, bucket) in rows {
                        tr {
                            key: "{name}",
                            td { "{name}" }
                            td { "{bucket.count}" }
                            td { "{format_currency(bucket.value)}" }
                        }
                    }
                }
            }
        }
    }
}
