use maud::{Markup, html};

use crate::{
    notification::Notification,
    views::{
        components::{glass_card, link_button},
        page,
    },
};

const FEATURES: [(&str, &str); 3] = [
    (
        "Event Planning",
        "Create and manage your events with ease. Get weather insights for each occasion.",
    ),
    (
        "AI Predictions",
        "Advanced machine learning models analyze weather patterns to give you accurate forecasts.",
    ),
    (
        "Smart Recommendations",
        "Receive actionable insights and recommendations to make informed decisions about your events.",
    ),
];

pub fn render(notification: Option<&Notification>) -> Markup {
    let body = html! {
        section.hero.hero-tall {
            h1 { "WeatherPredict" }
            p.muted {
                "Plan your events with confidence. Get accurate weather predictions powered by machine learning."
            }
            div.row {
                (link_button("/auth", "Get Started", false))
                (link_button("/auth", "Sign In", true))
            }
        }
        section.container {
            h2.text-center { "Why Choose WeatherPredict?" }
            div.grid {
                @for (title, text) in FEATURES {
                    (glass_card(Some("text-center"), html! {
                        h3 { (title) }
                        p.muted { (text) }
                    }))
                }
            }
        }
        section.container {
            (glass_card(Some("text-center narrow"), html! {
                h2 { "Ready to Get Started?" }
                p.muted { "Join WeatherPredict today and never let weather surprise your events again." }
                (link_button("/auth", "Create Free Account", false))
            }))
        }
    };
    page("WeatherPredict", notification, body)
}
