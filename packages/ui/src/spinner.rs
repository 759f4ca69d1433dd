use dioxus::prelude::*;

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div {
            class: "spinner-wrap",
            div { class: "spinner" }
            span { class: "spinner-label", "{label}" }
        }
    }
}
