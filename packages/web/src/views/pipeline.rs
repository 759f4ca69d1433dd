use api::{default_pipeline, format_currency, ApiError, AtRiskUpdate, ListFilter, Opportunity, Organization, Stage};
use dioxus::prelude::*;
use store::board::{self, Board, DropTarget};
use store::forms::{self, ENGAGEMENT_TYPES};
use store::{owners, Notice, OpportunityForm, OwnerNames};
use ui::{notify, use_session, use_session_state, use_toasts, Spinner};

use super::{mutate, use_loader, PageHeader};
use crate::Route;

const PIPELINE_CSS: Asset = asset!("/assets/pipeline.css");

/// Everything on the page that is not the cards themselves.
#[derive(Clone, PartialEq)]
struct PipelineContext {
    pipeline_id: String,
    name: String,
    organizations: Vec<Organization>,
    owners: OwnerNames,
}

#[component]
pub fn Pipeline() -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let mut data = use_loader("Failed to load pipeline", |client| async move {
        let pipelines = client.list_pipelines().await?;
        let Some(pipeline) = default_pipeline(&pipelines).cloned() else {
            return Ok(None);
        };
        let filter = ListFilter::pipeline(pipeline.pipeline_id.clone());
        let (stages, opportunities, organizations) = futures::try_join!(
            client.list_stages(&pipeline.pipeline_id),
            client.list_opportunities(&filter),
            client.list_organizations()
        )?;
        let owners = owners::load(&client).await;
        let context = PipelineContext {
            pipeline_id: pipeline.pipeline_id,
            name: pipeline.name,
            organizations,
            owners,
        };
        Ok::<_, ApiError>(Some((context, Board::new(stages, opportunities))))
    });

    let mut board = use_signal(|| None::<(PipelineContext, Board)>);
    use_effect(move || {
        if let Some(Some(loaded)) = &*data.read() {
            board.set(loaded.clone());
        }
    });

    let mut creating = use_signal(|| false);
    let mut flagging = use_signal(|| None::<String>);

    let mut dragging = use_signal(|| None::<String>);
    let drop_on = use_callback({
        let session = session.clone();
        move |target: DropTarget| {
            let Some(opp_id) = dragging.write().take() else {
                return;
            };
            let mv = board
                .read()
                .as_ref()
                .and_then(|(_, b)| b.resolve_drop(&opp_id, &target));
            let Some(mv) = mv else {
                return;
            };
            tracing::debug!("moving {} from {} to {}", mv.opp_id, mv.from_stage, mv.to_stage);
            let Some(mv) = board.write().as_mut().map(|(_, b)| b.apply(mv)) else {
                return;
            };
            let session = session.clone();
            spawn(async move {
                let result = board::commit_move(&session, &mv).await;
                let notice = board.write().as_mut().and_then(|(_, b)| b.settle(&mv, result));
                if let Some(notice) = notice {
                    notify(&mut toasts, notice);
                }
            });
        }
    });

    let set_risk = use_callback(move |(opp_id, update): (String, AtRiskUpdate)| {
        let client = session.client().clone();
        let success = if update.is_at_risk {
            "Marked as at-risk"
        } else {
            "At-risk status cleared"
        };
        spawn(async move {
            let updated = mutate(
                toasts,
                client.set_at_risk(&opp_id, &update),
                success,
                "Failed to update at-risk status",
            )
            .await;
            if let Some(updated) = updated {
                if let Some((_, b)) = board.write().as_mut() {
                    b.update_risk(&updated);
                }
                flagging.set(None);
            }
        });
    });

    let current = board.read().clone();
    let Some((context, current)) = current else {
        return rsx! {
            PageHeader { title: "Pipeline" }
            match &*data.read() {
                None => rsx! { Spinner {} },
                Some(Some(None)) => rsx! { p { class: "empty", "No pipeline has been set up yet." } },
                Some(_) => rsx! {},
            }
        };
    };
    let columns = current.columns();
    let flagged_name = flagging().and_then(|id| {
        current
            .opportunities()
            .iter()
            .find(|o| o.opp_id == id)
            .map(|o| (id, o.name.clone()))
    });

    rsx! {
        document::Stylesheet { href: PIPELINE_CSS }

        PageHeader {
            title: "Pipeline",
            subtitle: context.name.clone(),
            button {
                class: "btn primary",
                onclick: move |_| creating.toggle(),
                if creating() { "Cancel" } else { "New opportunity" }
            }
        }

        if creating() {
            NewOpportunity {
                pipeline_id: context.pipeline_id.clone(),
                stages: current.stages().to_vec(),
                organizations: context.organizations.clone(),
                owners: context.owners.clone(),
                on_created: move |_| {
                    creating.set(false);
                    data.restart();
                },
            }
        }

        if let Some((opp_id, name)) = flagged_name {
            AtRiskReason {
                opp_name: name,
                on_confirm: move |update: AtRiskUpdate| set_risk.call((opp_id.clone(), update)),
                on_cancel: move |_| flagging.set(None),
            }
        }

        div {
            class: "kanban",
            for column in columns {
                div {
                    key: "{column.stage.stage_id}",
                    class: "kanban-column",
                    ondragover: move |evt| evt.prevent_default(),
                    ondrop: {
                        let stage_id = column.stage.stage_id.clone();
                        move |evt: DragEvent| {
                            evt.prevent_default();
                            drop_on.call(DropTarget::Stage(stage_id.clone()));
                        }
                    },
                    div {
                        class: "kanban-column-header",
                        span { class: "kanban-stage", "{column.stage.name}" }
                        span { class: "kanban-count", "{column.cards.len()}" }
                    }
                    div { class: "kanban-total", "{format_currency(column.total_value)}" }
                    for opp in column.cards {
                        KanbanCard {
                            key: "{opp.opp_id}",
                            opp: opp.clone(),
                            owner: context.owners.name(&opp.owner_id).to_string(),
                            on_drag_start: move |opp_id: String| dragging.set(Some(opp_id)),
                            on_drag_end: move |_| dragging.set(None),
                            on_drop: move |opp_id: String| drop_on.call(DropTarget::Card(opp_id)),
                            on_flag: move |opp_id: String| flagging.set(Some(opp_id)),
                            on_clear: move |opp_id: String| set_risk.call((opp_id, AtRiskUpdate::clear())),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn KanbanCard(
    opp: Opportunity,
    owner: String,
    on_drag_start: EventHandler<String>,
    on_drag_end: EventHandler<()>,
    on_drop: EventHandler<String>,
    on_flag: EventHandler<String>,
    on_clear: EventHandler<String>,
) -> Element {
    let opp_id = opp.opp_id.clone();

    rsx! {
        div {
            class: if opp.is_at_risk { "kanban-card at-risk" } else { "kanban-card" },
            draggable: "true",
            ondragstart: {
                let opp_id = opp_id.clone();
                move |_| on_drag_start.call(opp_id.clone())
            },
            ondragend: move |_| on_drag_end.call(()),
            ondrop: {
                let opp_id = opp_id.clone();
                move |evt: DragEvent| {
                    evt.prevent_default();
                    evt.stop_propagation();
                    on_drop.call(opp_id.clone());
                }
            },
            Link {
                to: Route::OpportunityDetail { opp_id: opp_id.clone() },
                class: "kanban-card-title",
                "{opp.name}"
            }
            div {
                class: "kanban-card-meta",
                span { "{opp.engagement_type}" }
                span { class: "amount", "{format_currency(opp.estimated_value)}" }
            }
            div { class: "kanban-card-confidence", "{opp.confidence_level}% confidence" }
            div { class: "kanban-card-owner muted", "{owner}" }
            if let Some(reason) = opp.at_risk_reason.clone().filter(|_| opp.is_at_risk) {
                div { class: "kanban-card-risk", "{reason}" }
            }
            if opp.is_at_risk {
                button {
                    class: "btn small",
                    onclick: {
                        let opp_id = opp_id.clone();
                        move |_| on_clear.call(opp_id.clone())
                    },
                    "Clear at-risk"
                }
            } else {
                button {
                    class: "btn small warning",
                    onclick: {
                        let opp_id = opp_id.clone();
                        move |_| on_flag.call(opp_id.clone())
                    },
                    "Mark at-risk"
                }
            }
        }
    }
}

/// Asks why a card is being flagged before anything is sent.
#[component]
fn AtRiskReason(opp_name: String, on_confirm: EventHandler<AtRiskUpdate>, on_cancel: EventHandler<()>) -> Element {
    let mut toasts = use_toasts();
    let mut reason = use_signal(String::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        match forms::flag_at_risk(&*reason.read()) {
            Ok(update) => on_confirm.call(update),
            Err(e) => notify(&mut toasts, Notice::from_error(&e, "Please provide a reason")),
        }
    };

    rsx! {
        form {
            class: "card form-stack",
            onsubmit: onsubmit,
            h2 { "Mark \"{opp_name}\" as at-risk" }
            textarea {
                placeholder: "Reason for at-risk status",
                value: "{reason}",
                oninput: move |evt| reason.set(evt.value()),
            }
            div {
                class: "row-actions",
                button { class: "btn warning", r#type: "submit", "Mark at-risk" }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}

#[component]
fn NewOpportunity(
    pipeline_id: String,
    stages: Vec<Stage>,
    organizations: Vec<Organization>,
    owners: OwnerNames,
    on_created: EventHandler<()>,
) -> Element {
    let session = use_session();
    let state = use_session_state();
    let mut toasts = use_toasts();
    let first_stage = stages.first().map(|s| s.stage_id.clone()).unwrap_or_default();
    let mut form = use_signal(|| {
        let me = state.peek().user().map(|u| u.user_id.clone()).unwrap_or_default();
        OpportunityForm::new(first_stage, me)
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = match form.read().input(&pipeline_id) {
            Ok(input) => input,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, "Failed to create opportunity"));
                return;
            }
        };
        let client = session.client().clone();
        spawn(async move {
            let created = mutate(
                toasts,
                client.create_opportunity(&input),
                "Opportunity created",
                "Failed to create opportunity",
            )
            .await;
            if created.is_some() {
                on_created.call(());
            }
        });
    };

    rsx! {
        form {
            class: "card form-grid",
            onsubmit: onsubmit,
            input {
                placeholder: "Opportunity name",
                value: "{form.read().name}",
                oninput: move |evt| form.write().name = evt.value(),
            }
            select {
                value: "{form.read().org_id}",
                onchange: move |evt| form.write().org_id = evt.value(),
                option { value: "", "Select organization" }
                for org in organizations {
                    option { key: "{org.org_id}", value: "{org.org_id}", "{org.name}" }
                }
            }
            // Without the directory the only owner on offer is the current user.
            if !owners.is_empty() {
                select {
                    value: "{form.read().owner_id}",
                    onchange: move |evt| form.write().owner_id = evt.value(),
                    option { value: "", "Select owner" }
                    for user in owners.users().to_vec() {
                        option { key: "{user.user_id}", value: "{user.user_id}", "{user.display_name()}" }
                    }
                }
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
            input {
                placeholder: "Estimated value",
                value: "{form.read().estimated_value}",
                oninput: move |evt| form.write().estimated_value = evt.value(),
            }
            input {
                r#type: "number",
                min: "0",
                max: "100",
                placeholder: "Confidence (%)",
                value: "{form.read().confidence_level}",
                oninput: move |evt| form.write().confidence_level = evt.value(),
            }
            input {
                r#type: "date",
                value: "{form.read().target_close_date}",
                oninput: move |evt| form.write().target_close_date = evt.value(),
            }
            button { class: "btn primary", r#type: "submit", "Create" }
        }
    }
}
