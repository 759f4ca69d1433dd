use api::{format_currency, ApiError, ListFilter, Organization};
use dioxus::prelude::*;
use store::forms::TIERS;
use store::{owners, Notice, OrganizationForm};
use ui::{notify, use_session, use_toasts, Spinner};

use super::{mutate, use_loader, PageHeader};
use crate::Route;

#[component]
pub fn Organizations() -> Element {
    let mut data = use_loader("Failed to load organizations", |client| async move {
        client.list_organizations().await
    });
    let mut search = use_signal(String::new);
    let mut creating = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some(organizations)) = loaded else {
        return rsx! {
            PageHeader { title: "Clients" }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };

    let needle = search().trim().to_lowercase();
    let visible: Vec<Organization> = organizations
        .into_iter()
        .filter(|o| needle.is_empty() || o.name.to_lowercase().contains(&needle))
        .collect();

    rsx! {
        PageHeader {
            title: "Clients",
            subtitle: format!("{} organizations", visible.len()),
            input {
                class: "search",
                placeholder: "Search clients...",
                value: "{search}",
                oninput: move |evt| search.set(evt.value()),
            }
            button {
                class: "btn primary",
                onclick: move |_| creating.toggle(),
                if creating() { "Cancel" } else { "New client" }
            }
        }

        if creating() {
            OrganizationEditor {
                on_saved: move |_| {
                    creating.set(false);
                    data.restart();
                },
            }
        }

        table {
            class: "table",
            thead {
                tr {
                    th { "Name" }
                    th { "Industry" }
                    th { "Region" }
                    th { "Tier" }
                }
            }
            tbody {
                for org in visible {
                    tr {
                        key: "{org.org_id}",
                        td {
                            Link {
                                to: Route::OrganizationDetail { org_id: org.org_id.clone() },
                                "{org.name}"
                            }
                        }
                        td { "{org.industry.clone().unwrap_or_default()}" }
                        td { "{org.region.clone().unwrap_or_default()}" }
                        td { span { class: "badge", "{org.strategic_tier}" } }
                    }
                }
            }
        }
    }
}

/// Create form, or edit form when `org` is given.
#[component]
fn OrganizationEditor(#[props(default)] org: Option<Organization>, on_saved: EventHandler<()>) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let org_id = org.as_ref().map(|o| o.org_id.clone());
    let mut form = use_signal(|| org.as_ref().map(OrganizationForm::from).unwrap_or_default());
    let (success, fallback, submit) = match org_id {
        Some(_) => ("Organization updated", "Failed to update organization", "Save"),
        None => ("Organization created", "Failed to create organization", "Create"),
    };

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = match form.read().input() {
            Ok(input) => input,
            Err(e) => {
                notify(&mut toasts, Notice::from_error(&e, fallback));
                return;
            }
        };
        let client = session.client().clone();
        let org_id = org_id.clone();
        spawn(async move {
            let saved = match org_id {
                Some(org_id) => mutate(toasts, client.update_organization(&org_id, &input), success, fallback).await,
                None => mutate(toasts, client.create_organization(&input), success, fallback).await,
            };
            if saved.is_some() {
                form.set(OrganizationForm::default());
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
            input {
                placeholder: "Industry",
                value: "{form.read().industry}",
                oninput: move |evt| form.write().industry = evt.value(),
            }
            input {
                placeholder: "Region",
                value: "{form.read().region}",
                oninput: move |evt| form.write().region = evt.value(),
            }
            select {
                value: "{form.read().strategic_tier}",
                onchange: move |evt| form.write().strategic_tier = evt.value(),
                for tier in TIERS {
                    option { key: "{tier}", value: "{tier}", "{tier}" }
                }
            }
            textarea {
                placeholder: "Notes",
                value: "{form.read().notes}",
                oninput: move |evt| form.write().notes = evt.value(),
            }
            button { class: "btn primary", r#type: "submit", "{submit}" }
        }
    }
}

#[component]
pub fn OrganizationDetail(org_id: String) -> Element {
    let nav = use_navigator();
    let session = use_session();
    let toasts = use_toasts();
    let id = org_id.clone();
    let mut data = use_loader("Failed to load organization", move |client| {
        let id = id.clone();
        async move {
            let filter = ListFilter::org(id.clone());
            let (org, contacts, opportunities) = futures::try_join!(
                client.get_organization(&id),
                client.list_contacts(&filter),
                client.list_opportunities(&filter)
            )?;
            let owners = owners::load(&client).await;
            Ok::<_, ApiError>((org, contacts, opportunities, owners))
        }
    });
    let mut editing = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some((org, contacts, opportunities, owners))) = loaded else {
        return rsx! {
            if data.read().is_none() {
                Spinner {}
            } else {
                p { class: "empty", "This organization could not be loaded." }
                Link { to: Route::Organizations {}, "Back to clients" }
            }
        };
    };

    let on_delete = move |_| {
        let client = session.client().clone();
        let org_id = org_id.clone();
        async move {
            let deleted = mutate(
                toasts,
                client.delete_organization(&org_id),
                "Organization deleted",
                "Failed to delete",
            )
            .await;
            if deleted.is_some() {
                nav.replace(Route::Organizations {});
            }
        }
    };
    let pipeline_value: f64 = opportunities.iter().map(|o| o.estimated_value).sum();

    rsx! {
        PageHeader {
            title: org.name.clone(),
            subtitle: [org.industry.clone(), org.region.clone()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" · "),
            span { class: "badge", "{org.strategic_tier}" }
            button {
                class: "btn",
                onclick: move |_| editing.toggle(),
                if editing() { "Cancel" } else { "Edit" }
            }
            button { class: "btn danger", onclick: on_delete, "Delete" }
        }

        if editing() {
            OrganizationEditor {
                org: org.clone(),
                on_saved: move |_| {
                    editing.set(false);
                    data.restart();
                },
            }
        }

        if let Some(owner_id) = org.owner_id.clone() {
            p { class: "muted", "Owner: {owners.name(&owner_id)}" }
        }

        if let Some(notes) = org.notes.clone().filter(|n| !n.is_empty()) {
            p { class: "card notes", "{notes}" }
        }

        div {
            class: "dashboard-grid",
            section {
                class: "card",
                h2 { "Contacts" }
                if contacts.is_empty() {
                    p { class: "empty", "No contacts yet." }
                }
                ul {
                    class: "list",
                    for contact in contacts {
                        li {
                            key: "{contact.contact_id}",
                            Link {
                                to: Route::ContactDetail { contact_id: contact.contact_id.clone() },
                                "{contact.name}"
                            }
                            span { class: "muted", " {contact.title.clone().unwrap_or_default()}" }
                        }
                    }
                }
            }
            section {
                class: "card",
                h2 { "Opportunities ({format_currency(pipeline_value)})" }
                if opportunities.is_empty() {
                    p { class: "empty", "No opportunities yet." }
                }
                ul {
                    class: "list",
                    for opp in opportunities {
                        li {
                            key: "{opp.opp_id}",
                            Link {
                                to: Route::OpportunityDetail { opp_id: opp.opp_id.clone() },
                                "{opp.name}"
                            }
                            span { class: "amount", "{format_currency(opp.estimated_value)}" }
                        }
                    }
                }
            }
        }
    }
}
