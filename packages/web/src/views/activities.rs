use std::collections::HashMap;

use api::{Activity, ApiError, ListFilter, Opportunity};
use dioxus::prelude::*;
use store::forms::ACTIVITY_TYPES;
use store::{owners, ActivityForm, Notice};
use ui::{notify, use_session, use_toasts, Spinner};

use super::{mutate, use_loader, PageHeader};
use crate::Route;

const STATUS_FILTERS: [&str; 4] = ["All", "Planned", "Overdue", "Completed"];

#[component]
pub fn Activities() -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let mut data = use_loader("Failed to load activities", |client| async move {
        let filter = ListFilter::default();
        let (activities, opportunities) =
            futures::try_join!(client.list_activities(&filter), client.list_opportunities(&filter))?;
        let owners = owners::load(&client).await;
        Ok::<_, ApiError>((activities, opportunities, owners))
    });
    let mut status = use_signal(|| STATUS_FILTERS[0].to_string());
    let mut creating = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some((activities, opportunities, owners))) = loaded else {
        return rsx! {
            PageHeader { title: "Activities" }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    let opp_names: HashMap<String, String> = opportunities
        .iter()
        .map(|o| (o.opp_id.clone(), o.name.clone()))
        .collect();
    let mut visible: Vec<Activity> = activities
        .into_iter()
        .filter(|a| status() == "All" || a.status.eq_ignore_ascii_case(&status()))
        .collect();
    visible.sort_by(|a, b| a.due_date.cmp(&b.due_date));

    let complete = {
        let session = session.clone();
        move |activity_id: String| {
            let client = session.client().clone();
            spawn(async move {
                if mutate(
                    toasts,
                    client.complete_activity(&activity_id),
                    "Activity completed",
                    "Failed to complete activity",
                )
                .await
                .is_some()
                {
                    data.restart();
                }
            });
        }
    };
    let remove = move |activity_id: String| {
        let client = session.client().clone();
        spawn(async move {
            if mutate(
                toasts,
                client.delete_activity(&activity_id),
                "Activity deleted",
                "Failed to delete activity",
            )
            .await
            .is_some()
            {
                data.restart();
            }
        });
    };

    rsx! {
        PageHeader {
            title: "Activities",
            subtitle: format!("{} shown", visible.len()),
            select {
                value: "{status}",
                onchange: move |evt| status.set(evt.value()),
                for label in STATUS_FILTERS {
                    option { key: "{label}", value: "{label}", "{label}" }
                }
            }
            button {
                class: "btn primary",
                onclick: move |_| creating.toggle(),
                if creating() { "Cancel" } else { "New activity" }
            }
        }

        if creating() {
            NewActivity {
                opportunities: opportunities.clone(),
                on_created: move |_| {
                    creating.set(false);
                    data.restart();
                },
            }
        }

        if visible.is_empty() {
            p { class: "empty", "No activities match this filter." }
        }

        table {
            class: "table",
            thead {
                tr {
                    th { "Due" }
                    th { "Type" }
                    th { "Opportunity" }
                    th { "Owner" }
                    th { "Status" }
                    th { "Notes" }
                    th {}
                }
            }
            tbody {
                for activity in visible {
                    tr {
                        key: "{activity.activity_id}",
                        class: if activity.is_completed() { "done" } else { "" },
                        td { "{activity.due_date}" }
                        td { span { class: "badge", "{activity.activity_type}" } }
                        td {
                            Link {
                                to: Route::OpportunityDetail { opp_id: activity.opp_id.clone() },
                                "{opp_names.get(&activity.opp_id).cloned().unwrap_or_default()}"
                            }
                        }
                        td { "{owners.name(&activity.owner_id)}" }
                        td { "{activity.status}" }
                        td { "{activity.notes.clone().unwrap_or_default()}" }
                        td {
                            class: "row-actions",
                            if !activity.is_completed() {
                                button {
                                    class: "btn small",
                                    onclick: {
                                        let complete = complete.clone();
                                        let activity_id = activity.activity_id.clone();
                                        move |_| complete(activity_id.clone())
                                    },
                                    "Complete"
                                }
                            }
                            button {
                                class: "btn small danger",
                                onclick: {
                                    let remove = remove.clone();
                                    let activity_id = activity.activity_id.clone();
                                    move |_| remove(activity_id.clone())
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn NewActivity(opportunities: Vec<Opportunity>, on_created: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let mut form = use_signal(ActivityForm::default);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = match form.read().input() {
            Ok(input) => input,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, "Failed to create activity"));
                return;
            }
        };
        let client = session.client().clone();
        spawn(async move {
            let created = mutate(
                toasts,
                client.create_activity(&input),
                "Activity created",
                "Failed to create activity",
            )
            .await;
            if created.is_some() {
                form.set(ActivityForm::default());
                on_created.call(());
            }
        });
    };

    rsx! {
        form {
            class: "card form-grid",
            onsubmit: onsubmit,
            select {
                value: "{form.read().opp_id}",
                onchange: move |evt| form.write().opp_id = evt.value(),
                option { value: "", "Select opportunity" }
                for opp in opportunities {
                    option { key: "{opp.opp_id}", value: "{opp.opp_id}", "{opp.name}" }
                }
            }
            select {
                value: "{form.read().activity_type}",
                onchange: move |evt| form.write().activity_type = evt.value(),
                for kind in ACTIVITY_TYPES {
                    option { key: "{kind}", value: "{kind}", "{kind}" }
                }
            }
            input {
                r#type: "date",
                value: "{form.read().due_date}",
                oninput: move |evt| form.write().due_date = evt.value(),
            }
            textarea {
                placeholder: "Notes",
                value: "{form.read().notes}",
                oninput: move |evt| form.write().notes = evt.value(),
            }
            button { class: "btn primary", r#type: "submit", "Create" }
        }
    }
}
