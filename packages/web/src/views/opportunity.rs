use api::{format_currency, Activity, ApiError, AtRiskUpdate, ListFilter, Opportunity, Stage};
use dioxus::prelude::*;
use store::forms::{self, ACTIVITY_TYPES, ENGAGEMENT_TYPES};
use store::{owners, ActivityForm, Notice, OpportunityEditForm, OwnerNames};
use ui::{notify, use_session, use_toasts, Spinner};

use super::{mutate, use_loader, PageHeader};
use crate::Route;

#[component]
pub fn OpportunityDetail(opp_id: String) -> Element {
    let nav = use_navigator();
    let session = use_session();
    let toasts = use_toasts();
    let id = opp_id.clone();
    let mut data = use_loader("Failed to load opportunity", move |client| {
        let id = id.clone();
        async move {
            let filter = ListFilter::opportunity(id.clone());
            let (opp, activities) = futures::try_join!(
                client.get_opportunity(&id),
                client.list_activities(&filter)
            )?;
            let (stages, organization, owners) = futures::join!(
                client.list_stages(&opp.pipeline_id),
                client.get_organization(&opp.org_id),
                owners::load(&client)
            );
            let mut stages = stages?;
            stages.sort_by_key(|s| s.order);
            Ok::<_, ApiError>((opp, activities, stages, organization.ok(), owners))
        }
    });
    let mut editing = use_signal(|| false);
    let mut flagging = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some((opp, activities, stages, organization, owners))) = loaded else {
        return rsx! {
            if data.read().is_none() {
                Spinner {}
            } else {
                p { class: "empty", "This opportunity could not be loaded." }
                Link { to: Route::Pipeline {}, "Back to the pipeline" }
            }
        };
    };

    let on_stage = {
        let session = session.clone();
        let opp_id = opp_id.clone();
        let current = opp.stage_id.clone();
        move |evt: FormEvent| {
            let stage_id = evt.value();
            if stage_id == current {
                return;
            }
            let client = session.client().clone();
            let opp_id = opp_id.clone();
            spawn(async move {
                if mutate(toasts, client.move_opportunity(&opp_id, &stage_id), "Stage updated", "Failed to update")
                    .await
                    .is_some()
                {
                    data.restart();
                }
            });
        }
    };

    let on_clear_risk = {
        let session = session.clone();
        let opp_id = opp_id.clone();
        move |_| {
            let client = session.client().clone();
            let opp_id = opp_id.clone();
            async move {
                if mutate(
                    toasts,
                    client.set_at_risk(&opp_id, &AtRiskUpdate::clear()),
                    "At-risk status cleared",
                    "Failed to update at-risk status",
                )
                .await
                .is_some()
                {
                    data.restart();
                }
            }
        }
    };

    let on_delete = {
        let session = session.clone();
        let opp_id = opp_id.clone();
        move |_| {
            let client = session.client().clone();
            let opp_id = opp_id.clone();
            async move {
                let deleted = mutate(
                    toasts,
                    client.delete_opportunity(&opp_id),
                    "Opportunity deleted",
                    "Failed to delete",
                )
                .await;
                if deleted.is_some() {
                    nav.replace(Route::Pipeline {});
                }
            }
        }
    };

    rsx! {
        PageHeader {
            title: opp.name.clone(),
            subtitle: organization.as_ref().map(|o| o.name.clone()).unwrap_or_default(),
            select {
                value: "{opp.stage_id}",
                onchange: on_stage,
                for stage in stages.iter() {
                    option { key: "{stage.stage_id}", value: "{stage.stage_id}", "{stage.name}" }
                }
            }
            button {
                class: "btn",
                onclick: move |_| editing.toggle(),
                if editing() { "Cancel" } else { "Edit" }
            }
            if opp.is_at_risk {
                button { class: "btn", onclick: on_clear_risk, "Clear at-risk" }
            } else {
                button { class: "btn warning", onclick: move |_| flagging.toggle(), "Mark at-risk" }
            }
            button { class: "btn danger", onclick: on_delete, "Delete" }
        }

        if opp.is_at_risk {
            div {
                class: "card warning",
                p { "This opportunity is flagged as at risk." }
                if let Some(reason) = opp.at_risk_reason.clone() {
                    p { class: "notes", "{reason}" }
                }
            }
        }

        if flagging() && !opp.is_at_risk {
            FlagAtRisk {
                opp_id: opp_id.clone(),
                on_done: move |_| {
                    flagging.set(false);
                    data.restart();
                },
            }
        }

        if editing() {
            EditOpportunity {
                opp: opp.clone(),
                stages: stages.clone(),
                owners: owners.clone(),
                on_saved: move |_| {
                    editing.set(false);
                    data.restart();
                },
            }
        }

        section {
            class: "card",
            dl {
                class: "details",
                dt { "Owner" }
                dd { "{owners.name(&opp.owner_id)}" }
                dt { "Value" }
                dd { "{format_currency(opp.estimated_value)}" }
                dt { "Confidence" }
                dd { "{opp.confidence_level}%" }
                dt { "Engagement" }
                dd { "{opp.engagement_type}" }
                dt { "Target close" }
                dd { "{opp.target_close_date.clone().unwrap_or_default()}" }
                dt { "Source" }
                dd { "{opp.source.clone().unwrap_or_default()}" }
            }
            if let Some(hypothesis) = opp.value_hypothesis.clone().filter(|h| !h.is_empty()) {
                p { class: "notes", "{hypothesis}" }
            }
            if let Some(notes) = opp.notes.clone().filter(|n| !n.is_empty()) {
                p { class: "notes", "{notes}" }
            }
        }

        section {
            class: "card",
            h2 { "Activities" }
            NewActivity {
                opp_id: opp_id.clone(),
                on_created: move |_| data.restart(),
            }
            ActivityList {
                activities,
                on_changed: move |_| data.restart(),
            }
        }
    }
}

#[component]
fn EditOpportunity(opp: Opportunity, stages: Vec<Stage>, owners: OwnerNames, on_saved: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let opp_id = opp.opp_id.clone();
    let mut form = use_signal(|| OpportunityEditForm::from(&opp));

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let update = match form.read().update() {
            Ok(update) => update,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, "Failed to update"));
                return;
            }
        };
        let client = session.client().clone();
        let opp_id = opp_id.clone();
        spawn(async move {
            if mutate(
                toasts,
                client.update_opportunity(&opp_id, &update),
                "Opportunity updated",
                "Failed to update",
            )
            .await
            .is_some()
            {
                on_saved.call(());
            }
        });
    };

    rsx! {
        form {
            class: "card form-grid",
            onsubmit: onsubmit,
            input {
                placeholder: "Name",
                value: "{form.read().name}",
                oninput: move |evt| form.write().name = evt.value(),
            }
            select {
                value: "{form.read().engagement_type}",
                onchange: move |evt| form.write().engagement_type = evt.value(),
                for kind in ENGAGEMENT_TYPES {
                    option { key: "{kind}", value: "{kind}", "{kind}" }
                }
            }
            select {
                value: "{form.read().stage_id}",
                onchange: move |evt| form.write().stage_id = evt.value(),
                for stage in stages {
                    option { key: "{stage.stage_id}", value: "{stage.stage_id}", "{stage.name}" }
                }
            }
            if !owners.is_empty() {
                select {
                    value: "{form.read().owner_id}",
                    onchange: move |evt| form.write().owner_id = evt.value(),
                    for user in owners.users().to_vec() {
                        option { key: "{user.user_id}", value: "{user.user_id}", "{user.display_name()}" }
                    }
                }
            }
            input {
                placeholder: "Estimated value",
                value: "{form.read().estimated_value}",
                oninput: move |evt| form.write().estimated_value = evt.value(),
            }
            input {
                r#type: "number",
                min: "0",
                max: "100",
                value: "{form.read().confidence_level}",
                oninput: move |evt| form.write().confidence_level = evt.value(),
            }
            input {
                r#type: "date",
                value: "{form.read().target_close_date}",
                oninput: move |evt| form.write().target_close_date = evt.value(),
            }
            textarea {
                placeholder: "Value hypothesis",
                value: "{form.read().value_hypothesis}",
                oninput: move |evt| form.write().value_hypothesis = evt.value(),
            }
            textarea {
                placeholder: "Notes",
                value: "{form.read().notes}",
                oninput: move |evt| form.write().notes = evt.value(),
            }
            button { class: "btn primary", r#type: "submit", "Save" }
        }
    }
}

#[component]
fn FlagAtRisk(opp_id: String, on_done: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let mut reason = use_signal(String::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let update = match forms::flag_at_risk(&*reason.read()) {
            Ok(update) => update,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, "Please provide a reason"));
                return;
            }
        };
        let client = session.client().clone();
        let opp_id = opp_id.clone();
        spawn(async move {
            if mutate(
                toasts,
                client.set_at_risk(&opp_id, &update),
                "Marked as at-risk",
                "Failed to update at-risk status",
            )
            .await
            .is_some()
            {
                on_done.call(());
            }
        });
    };

    rsx! {
        form {
            class: "card form-stack",
            onsubmit: onsubmit,
            textarea {
                placeholder: "Reason for at-risk status",
                value: "{reason}",
                oninput: move |evt| reason.set(evt.value()),
            }
            button { class: "btn warning", r#type: "submit", "Mark at-risk" }
        }
    }
}

#[component]
fn NewActivity(opp_id: String, on_created: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let mut form = use_signal(|| ActivityForm {
        opp_id: opp_id.clone(),
        ..ActivityForm::default()
    });

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
            if mutate(toasts, client.create_activity(&input), "Activity created", "Failed to create activity")
                .await
                .is_some()
            {
                form.write().notes.clear();
                on_created.call(());
            }
        });
    };

    rsx! {
        form {
            class: "inline-form",
            onsubmit: onsubmit,
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
            input {
                placeholder: "Notes",
                value: "{form.read().notes}",
                oninput: move |evt| form.write().notes = evt.value(),
            }
            button { class: "btn", r#type: "submit", "Add" }
        }
    }
}

/// Activities with "complete" and "edit" actions for the open ones.
#[component]
fn ActivityList(activities: Vec<Activity>, on_changed: EventHandler<()>) -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let mut editing = use_signal(|| None::<String>);

    rsx! {
        if activities.is_empty() {
            p { class: "empty", "No activities yet." }
        }
        ul {
            class: "list",
            for activity in activities {
                li {
                    key: "{activity.activity_id}",
                    class: if activity.is_completed() { "activity done" } else { "activity" },
                    span { class: "badge", "{activity.activity_type}" }
                    span { " {activity.due_date} " }
                    span { class: "muted", "{activity.status}" }
                    if let Some(notes) = activity.notes.clone() {
                        span { class: "notes", " {notes}" }
                    }
                    if editing().as_deref() == Some(activity.activity_id.as_str()) {
                        EditActivity {
                            activity: activity.clone(),
                            on_saved: move |_| {
                                editing.set(None);
                                on_changed.call(());
                            },
                        }
                    } else if !activity.is_completed() {
                        button {
                            class: "btn small",
                            onclick: {
                                let activity_id = activity.activity_id.clone();
                                move |_| editing.set(Some(activity_id.clone()))
                            },
                            "Edit"
                        }
                    }
                    if !activity.is_completed() {
                        button {
                            class: "btn small",
                            onclick: {
                                let session = session.clone();
                                let activity_id = activity.activity_id.clone();
                                move |_| {
                                    let client = session.client().clone();
                                    let activity_id = activity_id.clone();
                                    async move {
                                        if mutate(
                                            toasts,
                                            client.complete_activity(&activity_id),
                                            "Activity completed",
                                            "Failed to complete activity",
                                        )
                                        .await
                                        .is_some()
                                        {
                                            on_changed.call(());
                                        }
                                    }
                                }
                            },
                            "Complete"
                        }
                    }
                }
            }
        }
    }
}

/// Reschedule an activity or rewrite its notes.
#[component]
fn EditActivity(activity: Activity, on_saved: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let activity_id = activity.activity_id.clone();
    let mut form = use_signal(|| ActivityForm::from(&activity));

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let update = match form.read().update() {
            Ok(update) => update,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, "Failed to update activity"));
                return;
            }
        };
        let client = session.client().clone();
        let activity_id = activity_id.clone();
        spawn(async move {
            if mutate(
                toasts,
                client.update_activity(&activity_id, &update),
                "Activity updated",
                "Failed to update activity",
            )
            .await
            .is_some()
            {
                on_saved.call(());
            }
        });
    };

    rsx! {
        form {
            class: "inline-form",
            onsubmit: onsubmit,
            input {
                r#type: "date",
                value: "{form.read().due_date}",
                oninput: move |evt| form.write().due_date = evt.value(),
            }
            input {
                placeholder: "Notes",
                value: "{form.read().notes}",
                oninput: move |evt| form.write().notes = evt.value(),
            }
            button { class: "btn small primary", r#type: "submit", "Save" }
        }
    }
}
