//! Server-Rendered Views
//!
//! Minimal page fragments for the storefront's customer-facing
//! outcomes. Page-rendering paths never surface a raw fault: every
//! outcome, including verification errors, is an explanatory view.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use store_core::SiteSettings;
use store_core::i18n::{self, Direction};

fn layout(settings: &SiteSettings, locale: &str, title: &str, body: &str) -> String {
    let dir = match i18n::direction(locale) {
        Direction::Rtl => "rtl",
        Direction::Ltr => "ltr",
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{locale}\" dir=\"{dir}\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | {name}</title></head>\n\
         <body>\n<main>\n{body}\n</main>\n\
         <footer><p>{copyright}</p></footer>\n\
         </body>\n</html>\n",
        name = settings.name,
        copyright = settings.copyright,
    )
}

/// Home page
pub fn home_page(settings: &SiteSettings, locale: &str) -> Html<String> {
    let t = |key| i18n::translate(locale, key);

    let body = format!(
        "<h1>{name}</h1>\n\
         <p>{slogan}</p>\n\
         <p>{welcome}</p>\n\
         <section><h2>{categories}</h2></section>\n\
         <section><h2>{deals}</h2></section>\n\
         <section><h2>{best_sellers}</h2></section>",
        name = settings.name,
        slogan = settings.slogan,
        welcome = t("home.welcome"),
        categories = t("home.categories"),
        deals = t("home.deals"),
        best_sellers = t("home.best_sellers"),
    );

    Html(layout(settings, locale, &settings.slogan, &body))
}

/// Checkout confirmation view
pub fn order_confirmed(settings: &SiteSettings, locale: &str, order_id: &str) -> Response {
    let t = |key| i18n::translate(locale, key);

    let body = format!(
        "<h1>{title}</h1>\n\
         <p>{message}</p>\n\
         <a href=\"/account/orders/{order_id}\">{view_order}</a>",
        title = t("success.title"),
        message = t("success.body"),
        view_order = t("success.view_order"),
    );

    Html(layout(settings, locale, t("success.title"), &body)).into_response()
}

/// Degraded view shown when payment status cannot be checked yet
pub fn payment_processing(settings: &SiteSettings, locale: &str, order_id: &str) -> Response {
    let t = |key| i18n::translate(locale, key);

    let body = format!(
        "<h1>{title}</h1>\n\
         <p>{message}</p>\n\
         <a href=\"/account/orders/{order_id}\">{view_order}</a>",
        title = t("processing.title"),
        message = t("processing.body"),
        view_order = t("success.view_order"),
    );

    Html(layout(settings, locale, t("processing.title"), &body)).into_response()
}

/// View shown when verification itself failed
pub fn verification_error(settings: &SiteSettings, locale: &str, order_id: &str) -> Response {
    let t = |key| i18n::translate(locale, key);

    let body = format!(
        "<h1>{title}</h1>\n\
         <p>{message}</p>\n\
         <a href=\"/account/orders/{order_id}\">{view_order}</a>",
        title = t("verify_error.title"),
        message = t("verify_error.body"),
        view_order = t("success.view_order"),
    );

    Html(layout(settings, locale, t("verify_error.title"), &body)).into_response()
}

/// Not-found view with a 404 status
pub fn not_found(settings: &SiteSettings, locale: &str) -> Response {
    let t = |key| i18n::translate(locale, key);

    let body = format!(
        "<h1>{title}</h1>\n<p>{message}</p>\n<a href=\"/\">{name}</a>",
        title = t("not_found.title"),
        message = t("not_found.body"),
        name = settings.name,
    );

    (
        StatusCode::NOT_FOUND,
        Html(layout(settings, locale, t("not_found.title"), &body)),
    )
        .into_response()
}
