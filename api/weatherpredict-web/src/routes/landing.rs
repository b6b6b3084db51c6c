use axum_extra::extract::cookie::CookieJar;

use maud::Markup;

use crate::{notification::take_flash, views};

pub async fn landing(jar: CookieJar) -> (CookieJar, Markup) {
    let (jar, notification) = take_flash(jar);
    (jar, views::landing::render(notification.as_ref()))
}
