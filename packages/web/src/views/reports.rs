use api::format_currency;
use dioxus::prelude::*;
use store::OwnerScope;
use ui::{use_session_state, Spinner};

use super::dashboard::MetricCard;
use super::{use_loader, PageHeader};

#[component]
pub fn Reports() -> Element {
    let state = use_session_state();
    let mut scope = use_signal(OwnerScope::default);
    // Reading `scope` inside the loader reloads the page data when it flips.
    let data = use_loader("Failed to load analytics", move |client| {
        let owner_id = scope().owner_id(state.peek().user());
        async move {
            let owner_id = owner_id.as_deref();
            futures::try_join!(
                client.pipeline_analytics(owner_id),
                client.engagement_analytics(owner_id),
                client.analytics_summary(owner_id),
                client.owner_analytics()
            )
        }
    });

    let toggle = rsx! {
        button {
            class: "btn",
            onclick: move |_| scope.set(scope().toggled()),
            "{scope().label()}"
        }
    };

    let loaded = data.read().clone();
    let Some(Some((stages, engagements, summary, owners))) = loaded else {
        return rsx! {
            PageHeader { title: "Reports", {toggle} }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    // Bar widths are relative to the largest row of each table.
    let max_value = stages.iter().map(|s| s.value).fold(0.0_f64, f64::max);
    let max_owner_value = owners.iter().map(|o| o.value).fold(0.0_f64, f64::max);

    rsx! {
        PageHeader {
            title: "Reports",
            subtitle: "Pipeline and engagement analytics".to_string(),
            {toggle}
        }

        div {
            class: "metric-cards",
            MetricCard {
                label: "Pipeline value",
                value: format_currency(summary.total_pipeline_value),
            }
            MetricCard { label: "Weighted forecast", value: format_currency(summary.weighted_forecast) }
            MetricCard { label: "Deals", value: summary.total_deals.to_string() }
            MetricCard { label: "Average deal", value: format_currency(summary.average_deal()) }
            MetricCard {
                label: "Win rate",
                value: format!("{:.0}% ({} won, {} lost)", summary.win_rate, summary.won_deals, summary.lost_deals),
            }
            MetricCard {
                label: "At risk",
                value: format!("{} ({} overdue activities)", summary.at_risk_deals, summary.overdue_activities),
            }
        }

        div {
            class: "dashboard-grid",
            section {
                class: "card",
                h2 { "Pipeline by stage" }
                if stages.is_empty() {
                    p { class: "empty", "No pipeline data yet." }
                }
                table {
                    class: "table",
                    thead {
                        tr {
                            th { "Stage" }
                            th { "Deals" }
                            th { "Value" }
                            th { "Weighted" }
                        }
                    }
                    tbody {
                        for row in stages {
                            tr {
                                key: "{row.stage_id}",
                                td {
                                    "{row.stage}"
                                    div {
                                        class: "bar",
                                        style: "width: {bar_width(row.value, max_value)}%",
                                    }
                                }
                                td { "{row.count}" }
                                td { "{format_currency(row.value)}" }
                                td { "{format_currency(row.weighted)}" }
                            }
                        }
                    }
                }
            }
            section {
                class: "card",
                h2 { "Engagement types" }
                if engagements.is_empty() {
                    p { class: "empty", "No engagement data yet." }
                }
                table {
                    class: "table",
                    thead {
                        tr {
                            th { "Type" }
                            th { "Deals" }
                            th { "Won" }
                            th { "Value" }
                            th { "Win rate" }
                        }
                    }
                    tbody {
                        for row in engagements {
                            tr {
                                key: "{row.engagement_type}",
                                td { "{row.engagement_type}" }
                                td { "{row.total}" }
                                td { "{row.won}" }
                                td { "{format_currency(row.value)}" }
                                td { "{row.win_rate:.0}%" }
                            }
                        }
                    }
                }
            }
        }

        section {
            class: "card",
            h2 { "Pipeline by owner" }
            if owners.is_empty() {
                p { class: "empty", "No owner data yet." }
            }
            table {
                class: "table",
                thead {
                    tr {
                        th { "Owner" }
                        th { "Deals" }
                        th { "Value" }
                    }
                }
                tbody {
                    for row in owners {
                        tr {
                            key: "{row.owner}",
                            td {
                                "{row.owner}"
                                div {
                                    class: "bar",
                                    style: "width: {bar_width(row.value, max_owner_value)}%",
                                }
                            }
                            td { "{row.count}" }
                            td { "{format_currency(row.value)}" }
                        }
                    }
                }
            }
        }
    }
}

fn bar_width(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(50.0, 200.0), 25.0);
        assert_eq!(bar_width(200.0, 200.0), 100.0);
        assert_eq!(bar_width(10.0, 0.0), 0.0);
    }
}
