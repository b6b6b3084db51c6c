use maud::{Markup, html};

use crate::notification::{Notification, Variant};

const GLASS_CARD_BASE: &str = "glass-card";

/// Translucent rounded container used by every screen. `extra_class` is
/// appended to the base style.
pub fn glass_card(extra_class: Option<&str>, children: Markup) -> Markup {
    let class = match extra_class.map(str::trim).filter(|c| !c.is_empty()) {
        Some(extra) => format!("{} {}", GLASS_CARD_BASE, extra),
        None => GLASS_CARD_BASE.to_string(),
    };
    html! {
        div class=(class) { (children) }
    }
}

pub fn notification_banner(notification: &Notification) -> Markup {
    let variant = match notification.variant {
        Variant::Default => "toast",
        Variant::Destructive => "toast toast-destructive",
    };
    html! {
        div class=(variant) role="status" {
            strong { (notification.title) }
            p { (notification.description) }
        }
    }
}

pub fn link_button(href: &str, label: &str, outline: bool) -> Markup {
    html! {
        a.button.button-outline[outline] href=(href) { (label) }
    }
}
