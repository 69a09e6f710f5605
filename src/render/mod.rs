//! Minimal server-side page rendering.
//!
//! Handlers fill a [`TemplateData`] bag and pick a [`Template`]; the page
//! bodies in [`pages`] read what they need from the bag. Every interpolated
//! value goes through `html-escape`.

use axum::response::Html;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::forms::Form;
use crate::session::Notices;

mod pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Home,
    About,
    GeneralsQuarters,
    MajorsSuite,
    Contact,
    SearchAvailability,
    ChooseRoom,
    MakeReservation,
    ReservationSummary,
    Login,
    AdminDashboard,
    AdminNewReservations,
    AdminAllReservations,
    AdminShowReservation,
    AdminCalendar,
}

impl Template {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::GeneralsQuarters => "General's Quarters",
            Self::MajorsSuite => "Major's Suite",
            Self::Contact => "Contact",
            Self::SearchAvailability => "Search for Availability",
            Self::ChooseRoom => "Choose a Room",
            Self::MakeReservation => "Make Reservation",
            Self::ReservationSummary => "Reservation Summary",
            Self::Login => "Login",
            Self::AdminDashboard => "Dashboard",
            Self::AdminNewReservations => "New Reservations",
            Self::AdminAllReservations => "All Reservations",
            Self::AdminShowReservation => "Reservation",
            Self::AdminCalendar => "Reservation Calendar",
        }
    }

    const fn is_admin(self) -> bool {
        matches!(
            self,
            Self::AdminDashboard
                | Self::AdminNewReservations
                | Self::AdminAllReservations
                | Self::AdminShowReservation
                | Self::AdminCalendar
        )
    }
}

/// Everything a page may show.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub int_map: HashMap<String, i64>,
    pub float_map: HashMap<String, f64>,
    pub data: Map<String, Value>,
    pub form: Option<Form>,
    pub flash: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub is_authenticated: bool,
}

impl TemplateData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.flash = notices.flash;
        self.warning = notices.warning;
        self.error = notices.error;
        self
    }

    #[must_use]
    pub const fn authenticated(mut self, is_authenticated: bool) -> Self {
        self.is_authenticated = is_authenticated;
        self
    }

    #[must_use]
    pub fn with_form(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    #[must_use]
    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.string_map.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.int_map.insert(key.to_string(), value);
        self
    }

    /// Serializes `value` into the data bag. A value that cannot be
    /// serialized is logged and left out.
    #[must_use]
    pub fn with_data(mut self, key: &str, value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.data.insert(key.to_string(), v);
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize template data"),
        }
        self
    }

    fn string(&self, key: &str) -> &str {
        self.string_map.get(key).map_or("", String::as_str)
    }

    fn value(&self, key: &str) -> &Value {
        self.data.get(key).unwrap_or(&Value::Null)
    }

    fn form_value(&self, field: &str) -> &str {
        self.form.as_ref().map_or("", |f| f.get(field))
    }

    fn form_error(&self, field: &str) -> Option<&str> {
        self.form.as_ref().and_then(|f| f.errors().get(field))
    }
}

#[must_use]
pub fn render(template: Template, data: &TemplateData) -> Html<String> {
    let body = pages::body(template, data);
    Html(layout(template, data, &body))
}

fn layout(template: Template, data: &TemplateData, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} | Fort Smythe Bed &amp; Breakfast</title>\n",
        text(template.title())
    ));
    html.push_str("<link rel=\"stylesheet\" href=\"/static/css/style.css\">\n</head>\n<body>\n");

    html.push_str("<nav class=\"navbar\"><a class=\"brand\" href=\"/\">Fort Smythe</a><ul>");
    for (href, label) in [
        ("/", "Home"),
        ("/about", "About"),
        ("/generals-quarters", "General's Quarters"),
        ("/majors-suite", "Major's Suite"),
        ("/search-availability", "Book Now"),
        ("/contact", "Contact"),
    ] {
        html.push_str(&format!("<li><a href=\"{href}\">{}</a></li>", text(label)));
    }
    if data.is_authenticated {
        html.push_str("<li><a href=\"/admin/dashboard\">Admin</a></li>");
        html.push_str("<li><a href=\"/user/logout\">Logout</a></li>");
    } else {
        html.push_str("<li><a href=\"/user/login\">Login</a></li>");
    }
    html.push_str("</ul></nav>\n");

    if template.is_admin() {
        html.push_str("<aside class=\"admin-menu\"><ul>");
        for (href, label) in [
            ("/admin/dashboard", "Dashboard"),
            ("/admin/reservations-new", "New Reservations"),
            ("/admin/reservations-all", "All Reservations"),
            ("/admin/reservations-calendar", "Reservation Calendar"),
        ] {
            html.push_str(&format!("<li><a href=\"{href}\">{label}</a></li>"));
        }
        html.push_str("</ul></aside>\n");
    }

    html.push_str("<main class=\"container\">\n");
    for (class, message) in [
        ("flash", &data.flash),
        ("warning", &data.warning),
        ("error", &data.error),
    ] {
        if let Some(message) = message {
            html.push_str(&format!(
                "<div class=\"notice notice-{class}\" role=\"alert\">{}</div>\n",
                text(message)
            ));
        }
    }
    html.push_str(body);
    html.push_str("</main>\n<footer class=\"footer\">Fort Smythe Bed &amp; Breakfast</footer>\n");
    html.push_str("<script src=\"/static/js/app.js\"></script>\n</body>\n</html>\n");
    html
}

fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}
