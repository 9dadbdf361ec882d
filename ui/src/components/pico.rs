//! Thin Dioxus wrappers around the Pico.css elements used by the account page.
//! Pico styles plain semantic HTML, so most of these only pick the element.

#![allow(non_snake_case)] // Allow PascalCase for component function names

use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;

/// Centered page container, `<main class="container">`.
#[component]
pub fn Container(children: Element) -> Element {
    rsx! { main { class: "container", {children} } }
}

/// A card, which Pico draws for every `<article>`.
#[component]
pub fn Card(#[props(default)] class: String, children: Element) -> Element {
    rsx! { article { class: "{class}", {children} } }
}

#[derive(PartialEq, Clone, Copy, Default)]
pub enum ButtonType {
    #[default]
    Primary,
    Secondary,
}

impl ButtonType {
    fn class(self, outline: bool) -> &'static str {
        match (self, outline) {
            (ButtonType::Primary, false) => "",
            (ButtonType::Primary, true) => "outline",
            (ButtonType::Secondary, false) => "secondary",
            (ButtonType::Secondary, true) => "secondary outline",
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ButtonProps {
    children: Element,
    #[props(optional)]
    on_click: Option<EventHandler<MouseEvent>>,
    #[props(default)]
    button_type: ButtonType,
    #[props(default = false)]
    outline: bool,
}

pub fn Button(props: ButtonProps) -> Element {
    let class = props.button_type.class(props.outline);
    rsx! {
        button {
            class: "{class}",
            onclick: move |evt| {
                if let Some(handler) = &props.on_click {
                    handler.call(evt);
                }
            },
            {props.children}
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ModalProps {
    is_open: Signal<bool>,
    title: String,
    children: Element,
}

/// A dialog with a title bar. Closes on the close link or the Escape key.
pub fn Modal(mut props: ModalProps) -> Element {
    rsx! {
        if (props.is_open)() {
            dialog {
                open: true,
                onkeydown: move |evt| {
                    if evt.key() == Key::Escape {
                        props.is_open.set(false);
                    }
                },
                article {
                    header {
                        a {
                            href: "#",
                            "aria-label": "Close",
                            rel: "prev",
                            onclick: move |evt| {
                                evt.prevent_default();
                                props.is_open.set(false);
                            },
                        }
                        h3 { style: "margin-bottom: 0;", "{props.title}" }
                    }
                    {props.children}
                }
            }
        }
    }
}
