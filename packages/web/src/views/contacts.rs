use std::collections::HashMap;

use api::{ApiError, Contact, ListFilter, Organization};
use dioxus::prelude::*;
use store::owners::{self, UNASSIGNED};
use store::{ContactForm, Notice};
use ui::{notify, use_session, use_toasts, Spinner};

use super::{mutate, use_loader, PageHeader};
use crate::Route;

const BUYING_ROLES: [&str; 5] = ["Decision Maker", "Influencer", "Champion", "Evaluator", "Blocker"];

#[component]
pub fn Contacts() -> Element {
    let mut data = use_loader("Failed to load contacts", |client| async move {
        let filter = ListFilter::default();
        futures::try_join!(client.list_contacts(&filter), client.list_organizations())
    });
    let mut creating = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some((contacts, organizations))) = loaded else {
        return rsx! {
            PageHeader { title: "Contacts" }
            if data.read().is_none() {
                Spinner {}
            }
        };
    };
    let org_names: HashMap<String, String> = organizations
        .iter()
        .map(|o| (o.org_id.clone(), o.name.clone()))
        .collect();

    rsx! {
        PageHeader {
            title: "Contacts",
            subtitle: format!("{} people", contacts.len()),
            button {
                class: "btn primary",
                onclick: move |_| creating.toggle(),
                if creating() { "Cancel" } else { "New contact" }
            }
        }

        if creating() {
            ContactEditor {
                organizations: organizations.clone(),
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
                    th { "Title" }
                    th { "Organization" }
                    th { "Role" }
                    th { "Email" }
                }
            }
            tbody {
                for contact in contacts {
                    tr {
                        key: "{contact.contact_id}",
                        td {
                            Link {
                                to: Route::ContactDetail { contact_id: contact.contact_id.clone() },
                                "{contact.name}"
                            }
                        }
                        td { "{contact.title.clone().unwrap_or_default()}" }
                        td {
                            Link {
                                to: Route::OrganizationDetail { org_id: contact.org_id.clone() },
                                "{org_names.get(&contact.org_id).cloned().unwrap_or_default()}"
                            }
                        }
                        td { "{contact.buying_role.clone().unwrap_or_default()}" }
                        td { "{contact.email.clone().unwrap_or_default()}" }
                    }
                }
            }
        }
    }
}

/// Create form, or edit form when `contact` is given.
#[component]
fn ContactEditor(
    #[props(default)] contact: Option<Contact>,
    organizations: Vec<Organization>,
    on_saved: EventHandler<()>,
) -> Element {
    let session = use_session();
    let mut toasts = use_toasts();
    let contact_id = contact.as_ref().map(|c| c.contact_id.clone());
    let mut form = use_signal(|| contact.as_ref().map(ContactForm::from).unwrap_or_default());
    let (success, fallback, submit) = match contact_id {
        Some(_) => ("Contact updated", "Failed to update contact", "Save"),
        None => ("Contact created", "Failed to create contact", "Create"),
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
        let contact_id = contact_id.clone();
        spawn(async move {
            let saved = match contact_id {
                Some(contact_id) => mutate(toasts, client.update_contact(&contact_id, &input), success, fallback).await,
                None => mutate(toasts, client.create_contact(&input), success, fallback).await,
            };
            if saved.is_some() {
                form.set(ContactForm::default());
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
                value: "{form.read().org_id}",
                onchange: move |evt| form.write().org_id = evt.value(),
                option { value: "", "Select organization" }
                for org in organizations {
                    option { key: "{org.org_id}", value: "{org.org_id}", "{org.name}" }
                }
            }
            input {
                placeholder: "Title",
                value: "{form.read().title}",
                oninput: move |evt| form.write().title = evt.value(),
            }
            input {
                placeholder: "Email",
                r#type: "email",
                value: "{form.read().email}",
                oninput: move |evt| form.write().email = evt.value(),
            }
            input {
                placeholder: "Phone",
                value: "{form.read().phone}",
                oninput: move |evt| form.write().phone = evt.value(),
            }
            select {
                value: "{form.read().buying_role}",
                onchange: move |evt| form.write().buying_role = evt.value(),
                option { value: "", "Buying role" }
                for role in BUYING_ROLES {
                    option { key: "{role}", value: "{role}", "{role}" }
                }
            }
            button { class: "btn primary", r#type: "submit", "{submit}" }
        }
    }
}

#[component]
pub fn ContactDetail(contact_id: String) -> Element {
    let nav = use_navigator();
    let session = use_session();
    let toasts = use_toasts();
    let id = contact_id.clone();
    let mut data = use_loader("Failed to load contact", move |client| {
        let id = id.clone();
        async move {
            let contact = client.get_contact(&id).await?;
            let (organizations, owners) = futures::join!(client.list_organizations(), owners::load(&client));
            Ok::<_, ApiError>((contact, organizations?, owners))
        }
    });
    let mut editing = use_signal(|| false);

    let loaded = data.read().clone();
    let Some(Some((contact, organizations, owners))) = loaded else {
        return rsx! {
            if data.read().is_none() {
                Spinner {}
            } else {
                p { class: "empty", "This contact could not be loaded." }
                Link { to: Route::Contacts {}, "Back to contacts" }
            }
        };
    };

    let organization = organizations.iter().find(|o| o.org_id == contact.org_id).cloned();
    let owner = contact
        .owner_id
        .as_deref()
        .map_or(UNASSIGNED, |id| owners.name(id))
        .to_string();

    let on_delete = move |_| {
        let client = session.client().clone();
        let contact_id = contact_id.clone();
        async move {
            let deleted = mutate(
                toasts,
                client.delete_contact(&contact_id),
                "Contact deleted",
                "Failed to delete",
            )
            .await;
            if deleted.is_some() {
                nav.replace(Route::Contacts {});
            }
        }
    };

    rsx! {
        PageHeader {
            title: contact.name.clone(),
            subtitle: contact.title.clone().unwrap_or_default(),
            button {
                class: "btn",
                onclick: move |_| editing.toggle(),
                if editing() { "Cancel" } else { "Edit" }
            }
            button { class: "btn danger", onclick: on_delete, "Delete" }
        }

        if editing() {
            ContactEditor {
                contact: contact.clone(),
                organizations: organizations.clone(),
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
                dt { "Organization" }
                dd {
                    if let Some(org) = organization {
                        Link {
                            to: Route::OrganizationDetail { org_id: org.org_id.clone() },
                            "{org.name}"
                        }
                    } else {
                        "Unknown"
                    }
                }
                dt { "Owner" }
                dd { "{owner}" }
                dt { "Function" }
                dd { "{contact.function.clone().unwrap_or_default()}" }
                dt { "Buying role" }
                dd { "{contact.buying_role.clone().unwrap_or_default()}" }
                dt { "Email" }
                dd { "{contact.email.clone().unwrap_or_default()}" }
                dt { "Phone" }
                dd { "{contact.phone.clone().unwrap_or_default()}" }
            }
            if let Some(notes) = contact.notes.clone() {
                p { class: "notes", "{notes}" }
            }
        }
    }
}
