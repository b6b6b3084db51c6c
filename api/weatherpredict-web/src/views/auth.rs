use maud::{Markup, html};

use crate::{
    notification::Notification,
    views::{components::glass_card, page},
};

fn credentials_form(id: &str, heading: &str, submit: &str, email: &str) -> Markup {
    let email_id = format!("{}-email", id);
    let password_id = format!("{}-password", id);
    glass_card(
        None,
        html! {
            h2 { (heading) }
            form method="post" action=(format!("/auth/{}", id)) {
                label for=(email_id) { "Email" }
                input id=(email_id) name="email" type="email" value=(email) required;
                label for=(password_id) { "Password" }
                input id=(password_id) name="password" type="password" minlength="6" required;
                p { button.button type="submit" { (submit) } }
            }
        },
    )
}

/// Sign-in and sign-up side by side. `email` is echoed back after a failed
/// attempt.
pub fn render(email: &str, notification: Option<&Notification>) -> Markup {
    let body = html! {
        section.container.narrow {
            p { a href="/" { "← Back" } }
            h1.text-center { "Welcome to WeatherPredict" }
            div.grid {
                (credentials_form("sign-in", "Sign In", "Sign In", email))
                (credentials_form("sign-up", "Create Account", "Sign Up", email))
            }
        }
    };
    page("Sign in - WeatherPredict", notification, body)
}
