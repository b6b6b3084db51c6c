use maud::{Markup, html};

use crate::{
    notification::Notification,
    views::{components::glass_card, page},
};

/// Raw form values, echoed back when the form is re-rendered.
#[derive(Debug, Default, Clone)]
pub struct FormValues<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub event_date: &'a str,
    pub location: &'a str,
}

pub fn render(values: &FormValues<'_>, notification: Option<&Notification>) -> Markup {
    let form = html! {
        h1 { "Create New Event" }
        form method="post" action="/create-event" {
            label for="title" { "Event Title" }
            input id="title" name="title" value=(values.title) placeholder="Summer BBQ Party" required;
            label for="description" { "Description" }
            textarea id="description" name="description" rows="4"
                placeholder="Outdoor gathering with friends and family..." { (values.description) }
            label for="event_date" { "Event Date & Time" }
            input id="event_date" name="event_date" type="datetime-local" value=(values.event_date) required;
            label for="location" { "Location" }
            input id="location" name="location" value=(values.location) placeholder="Central Park, New York" required;
            div.row style="margin-top: 1.5rem" {
                a.button.button-outline href="/dashboard" { "Cancel" }
                button.button type="submit" { "Create Event" }
            }
        }
    };
    let body = html! {
        section.container.narrow {
            p { a href="/dashboard" { "← Back to Dashboard" } }
            (glass_card(None, form))
        }
    };
    page("Create Event - WeatherPredict", notification, body)
}
