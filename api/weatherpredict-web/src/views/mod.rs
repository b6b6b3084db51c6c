use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::notification::Notification;

pub mod auth;
pub mod components;
pub mod create_event;
pub mod dashboard;
pub mod landing;

const STYLE: &str = r#"
:root { --bg: #0b1220; --card: rgba(30, 41, 59, 0.5); --fg: #e2e8f0; --muted: #94a3b8; --primary: #38bdf8; --danger: #f87171; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--fg); }
a { color: inherit; }
.container { max-width: 72rem; margin: 0 auto; padding: 3rem 1rem; }
.narrow { max-width: 42rem; }
.hero { min-height: 24rem; display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; padding: 2rem; background: linear-gradient(180deg, #1e3a5f, var(--bg)); position: relative; }
.hero-tall { min-height: 100vh; }
.glass-card { backdrop-filter: blur(12px); background: var(--card); border: 1px solid rgba(255, 255, 255, 0.1); border-radius: 1rem; padding: 1.5rem; box-shadow: 0 0 40px rgba(56, 189, 248, 0.15); transition: all 0.3s; }
.glass-card:hover { border-color: rgba(255, 255, 255, 0.2); }
.text-center { text-align: center; }
.muted { color: var(--muted); }
.grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); }
.row { display: flex; justify-content: space-between; align-items: center; gap: 1rem; }
.button { display: inline-block; padding: 0.6rem 1.4rem; border-radius: 0.5rem; background: var(--primary); color: #0b1220; text-decoration: none; border: none; font: inherit; cursor: pointer; }
.button-outline { background: transparent; color: var(--fg); border: 1px solid rgba(255, 255, 255, 0.2); }
.big { font-size: 3.5rem; font-weight: 700; margin: 1.5rem 0; }
.top-right { position: absolute; top: 1rem; right: 1rem; }
.prediction { border-top: 1px solid rgba(255, 255, 255, 0.1); padding-top: 1rem; margin-top: 1rem; }
.recommendation { background: rgba(56, 189, 248, 0.1); border: 1px solid rgba(56, 189, 248, 0.2); border-radius: 0.5rem; padding: 0.75rem; }
.pending { font-style: italic; color: var(--muted); }
label { display: block; margin: 1rem 0 0.4rem; }
input, textarea { width: 100%; padding: 0.6rem; border-radius: 0.5rem; border: 1px solid rgba(255, 255, 255, 0.1); background: rgba(51, 65, 85, 0.5); color: var(--fg); font: inherit; }
.toast { position: fixed; bottom: 1rem; right: 1rem; max-width: 24rem; padding: 1rem; border-radius: 0.75rem; background: #1e293b; border: 1px solid rgba(255, 255, 255, 0.1); }
.toast p { margin: 0.25rem 0 0; }
.toast-destructive { background: #7f1d1d; border-color: var(--danger); }
"#;

/// Wraps a screen body in the shared document shell. A notification, if
/// given, is shown once on this render.
pub fn page(title: &str, notification: Option<&Notification>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (body)
                div id="notifications" {
                    @if let Some(notification) = notification {
                        (components::notification_banner(notification))
                    }
                }
            }
        }
    }
}
