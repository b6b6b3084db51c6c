use maud::{Markup, PreEscaped, html};
use weatherpredict_app::workflow::dashboard::{EventCardView, PredictionView};

use crate::{
    notification::Notification,
    views::{
        components::{glass_card, link_button, notification_banner},
        page,
    },
};

pub const PENDING_TEXT: &str = "Weather prediction pending...";
pub const LOADING_TEXT: &str = "Loading your events...";

const DASHBOARD_SCRIPT: &str = r#"
(function () {
  const section = document.getElementById("events");
  async function loadEvents() {
    section.innerHTML = '<div class="text-center"><p class="muted">Loading your events...</p></div>';
    const response = await fetch("/dashboard/events", { credentials: "same-origin" });
    if (response.status === 401) { window.location.assign("/auth"); return; }
    section.innerHTML = await response.text();
  }
  const source = new EventSource("/dashboard/session-events");
  source.addEventListener("signed_in", loadEvents);
  source.addEventListener("signed_out", function () { window.location.assign("/auth"); });
  window.addEventListener("pagehide", function () { source.close(); });
  loadEvents();
})();
"#;

/// The dashboard page with its event section still loading.
pub fn render_shell(notification: Option<&Notification>) -> Markup {
    let body = html! {
        section.hero {
            (glass_card(Some("text-center narrow"), html! {
                h1 { "Weather Forecast" }
                p.muted { "Central Jakarta" }
                div.big { "10°C" }
                p.muted { "Storm with Heavy Rain" }
            }))
            form.top-right method="post" action="/sign-out" {
                button.button.button-outline type="submit" { "Sign Out" }
            }
        }
        section.container {
            div.row {
                h2 { "Your Events" }
                (link_button("/create-event", "+ Create Event", false))
            }
            div id="events" {
                div.text-center { p.muted { (LOADING_TEXT) } }
            }
        }
        script { (PreEscaped(DASHBOARD_SCRIPT)) }
    };
    page("Dashboard - WeatherPredict", notification, body)
}

/// The event section: either the empty state or one card per event, with
/// an optional inline notification.
pub fn render_events(cards: &[EventCardView], notification: Option<&Notification>) -> Markup {
    html! {
        @if let Some(notification) = notification {
            (notification_banner(notification))
        }
        @if cards.is_empty() {
            (glass_card(Some("text-center"), html! {
                h3 { "No events yet" }
                p.muted { "Create your first event to get weather predictions" }
                (link_button("/create-event", "+ Create Event", false))
            }))
        } @else {
            div.grid {
                @for card in cards {
                    (render_card(card))
                }
            }
        }
    }
}

fn render_card(card: &EventCardView) -> Markup {
    let event = &card.event;
    glass_card(
        None,
        html! {
            article data-event-id=(event.id) {
                h3 { (event.title) }
                p.muted { (event.description) }
                p.muted { (event.event_date.format("%Y-%m-%d %H:%M")) }
                p.muted { (event.location) }
                @match &card.prediction {
                    Some(prediction) => {
                        (render_prediction(prediction))
                    }
                    None => {
                        div.prediction { p.pending { (PENDING_TEXT) } }
                    }
                }
            }
        },
    )
}

fn render_prediction(prediction: &PredictionView) -> Markup {
    html! {
        div.prediction {
            div.row {
                strong { (prediction.temperature_celsius) "°C" }
                span.muted { (prediction.conditions) }
            }
            p {
                "Humidity: " (prediction.humidity_percent) "% · Wind: "
                (prediction.wind_speed_kmh) " km/h · Rain: "
                (prediction.precipitation_chance) "%"
            }
            div.recommendation { p { (prediction.recommendation) } }
        }
    }
}
