use serde_json::Value;
use std::fmt::Write;

use super::{Template, TemplateData, attr, text};

pub(super) fn body(template: Template, data: &TemplateData) -> String {
    match template {
        Template::Home => home(),
        Template::About => about(),
        Template::GeneralsQuarters => room_page(1, "General's Quarters"),
        Template::MajorsSuite => room_page(2, "Major's Suite"),
        Template::Contact => contact(),
        Template::SearchAvailability => search_availability(data),
        Template::ChooseRoom => choose_room(data),
        Template::MakeReservation => make_reservation(data),
        Template::ReservationSummary => reservation_summary(data),
        Template::Login => login(data),
        Template::AdminDashboard => admin_dashboard(data),
        Template::AdminNewReservations => reservation_table(data, "new"),
        Template::AdminAllReservations => reservation_table(data, "all"),
        Template::AdminShowReservation => admin_show_reservation(data),
        Template::AdminCalendar => admin_calendar(data),
    }
}

/// String at `path` inside `value`; numbers are formatted, anything else is empty.
fn field(value: &Value, path: &[&str]) -> String {
    let found = path.iter().try_fold(value, |v, key| v.get(*key));
    match found {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn input(data: &TemplateData, name: &str, label: &str, kind: &str) -> String {
    let mut html = String::new();
    let invalid = data.form_error(name);
    let _ = write!(
        html,
        "<div class=\"field\"><label for=\"{name}\">{}</label>\
         <input type=\"{kind}\" id=\"{name}\" name=\"{name}\" value=\"{}\"{}>",
        text(label),
        attr(data.form_value(name)),
        if invalid.is_some() { " class=\"is-invalid\"" } else { "" },
    );
    if let Some(message) = invalid {
        let _ = write!(html, "<div class=\"invalid-feedback\">{}</div>", text(message));
    }
    html.push_str("</div>");
    html
}

fn home() -> String {
    "<section class=\"hero\"><h1>Welcome to Fort Smythe Bed and Breakfast</h1>\
     <p>Your home away from home, set on the majestic waters of the Atlantic Ocean, \
     this will be a vacation to remember.</p>\
     <a class=\"button\" href=\"/search-availability\">Make Reservation Now</a></section>\n"
        .to_string()
}

fn about() -> String {
    "<h1>About</h1><p>Fort Smythe is a small bed and breakfast with two rooms, \
     the General's Quarters and the Major's Suite.</p>\n"
        .to_string()
}

fn room_page(room_id: i32, name: &str) -> String {
    format!(
        "<h1>{}</h1>\
         <p>Your home away from home, set on the majestic waters of the Atlantic Ocean.</p>\
         <form class=\"check-availability\" data-room-id=\"{room_id}\">\
         <label>Arrival <input type=\"date\" name=\"start\" required></label>\
         <label>Departure <input type=\"date\" name=\"end\" required></label>\
         <input type=\"hidden\" name=\"room_id\" value=\"{room_id}\">\
         <button type=\"submit\">Check Availability</button></form>\
         <div class=\"availability-result\" hidden></div>\n",
        text(name),
    )
}

fn contact() -> String {
    "<h1>Contact</h1><p>Fort Smythe Bed and Breakfast, 100 Rocky Road, Northampton.</p>\
     <p>Email: <a href=\"mailto:info@fortsmythe.example\">info@fortsmythe.example</a></p>\n"
        .to_string()
}

fn search_availability(data: &TemplateData) -> String {
    format!(
        "<h1>Search for Availability</h1>\
         <form method=\"post\" action=\"/search-availability\" novalidate>\
         <div class=\"field\"><label for=\"start\">Starting Date</label>\
         <input type=\"date\" id=\"start\" name=\"start\" value=\"{}\" required></div>\
         <div class=\"field\"><label for=\"end\">Ending Date</label>\
         <input type=\"date\" id=\"end\" name=\"end\" value=\"{}\" required></div>\
         <button type=\"submit\">Search Availability</button></form>\n",
        attr(data.form_value("start")),
        attr(data.form_value("end")),
    )
}

fn choose_room(data: &TemplateData) -> String {
    let mut html = String::from("<h1>Choose a Room</h1><ul class=\"rooms\">");
    if let Some(rooms) = data.value("rooms").as_array() {
        for room in rooms {
            let _ = write!(
                html,
                "<li><a href=\"/choose-room/{}\">{}</a></li>",
                attr(&field(room, &["id"])),
                text(&field(room, &["room_name"])),
            );
        }
    }
    html.push_str("</ul>\n");
    html
}

fn make_reservation(data: &TemplateData) -> String {
    let reservation = data.value("reservation");
    let mut html = String::new();
    let _ = write!(
        html,
        "<h1>Make Reservation</h1>\
         <p><strong>Reservation Details</strong><br>\
         Room: {}<br>Arrival: {}<br>Departure: {}</p>\
         <form method=\"post\" action=\"/make-reservation\" novalidate>",
        text(&field(reservation, &["room", "room_name"])),
        text(&field(reservation, &["start_date"])),
        text(&field(reservation, &["end_date"])),
    );
    html.push_str(&input(data, "first_name", "First Name", "text"));
    html.push_str(&input(data, "last_name", "Last Name", "text"));
    html.push_str(&input(data, "email", "Email", "email"));
    html.push_str(&input(data, "phone", "Phone", "text"));
    html.push_str("<button type=\"submit\">Make Reservation</button></form>\n");
    html
}

fn reservation_summary(data: &TemplateData) -> String {
    let r = data.value("reservation");
    format!(
        "<h1>Reservation Summary</h1><table class=\"summary\">\
         <tr><td>Name:</td><td>{} {}</td></tr>\
         <tr><td>Room:</td><td>{}</td></tr>\
         <tr><td>Arrival:</td><td>{}</td></tr>\
         <tr><td>Departure:</td><td>{}</td></tr>\
         <tr><td>Email:</td><td>{}</td></tr>\
         <tr><td>Phone:</td><td>{}</td></tr></table>\n",
        text(&field(r, &["guest", "first_name"])),
        text(&field(r, &["guest", "last_name"])),
        text(&field(r, &["room", "room_name"])),
        text(&field(r, &["start_date"])),
        text(&field(r, &["end_date"])),
        text(&field(r, &["guest", "email"])),
        text(&field(r, &["guest", "phone"])),
    )
}

fn login(data: &TemplateData) -> String {
    let mut html =
        String::from("<h1>Login</h1><form method=\"post\" action=\"/user/login\" novalidate>");
    html.push_str(&input(data, "email", "Email", "email"));
    html.push_str(&input(data, "password", "Password", "password"));
    html.push_str("<button type=\"submit\">Login</button></form>\n");
    html
}

fn admin_dashboard(data: &TemplateData) -> String {
    let new_count = data.int_map.get("new_reservations").copied().unwrap_or_default();
    let all_count = data.int_map.get("all_reservations").copied().unwrap_or_default();
    format!(
        "<h1>Dashboard</h1>\
         <p><a href=\"/admin/reservations-new\">New reservations: {new_count}</a></p>\
         <p><a href=\"/admin/reservations-all\">All reservations: {all_count}</a></p>\n"
    )
}

fn reservation_table(data: &TemplateData, src: &str) -> String {
    let title = if src == "new" {
        "New Reservations"
    } else {
        "All Reservations"
    };
    let mut html = format!(
        "<h1>{title}</h1><table class=\"reservations\"><thead><tr>\
         <th>ID</th><th>Last Name</th><th>Room</th><th>Arrival</th><th>Departure</th>\
         </tr></thead><tbody>"
    );
    if let Some(reservations) = data.value("reservations").as_array() {
        for r in reservations {
            let id = field(r, &["id"]);
            let _ = write!(
                html,
                "<tr><td>{}</td><td><a href=\"/admin/reservations/{src}/{}/show\">{}</a></td>\
                 <td>{}</td><td>{}</td><td>{}</td></tr>",
                text(&id),
                attr(&id),
                text(&field(r, &["last_name"])),
                text(&field(r, &["room", "room_name"])),
                text(&field(r, &["start_date"])),
                text(&field(r, &["end_date"])),
            );
        }
    }
    html.push_str("</tbody></table>\n");
    html
}

fn admin_show_reservation(data: &TemplateData) -> String {
    let r = data.value("reservation");
    let src = data.string("src");
    let id = field(r, &["id"]);
    let mut html = String::new();
    let _ = write!(
        html,
        "<h1>Reservation {}</h1>\
         <p>Room: {}<br>Arrival: {}<br>Departure: {}<br>Processed: {}</p>\
         <form method=\"post\" action=\"/admin/reservations/{}/{}\" novalidate>",
        text(&id),
        text(&field(r, &["room", "room_name"])),
        text(&field(r, &["start_date"])),
        text(&field(r, &["end_date"])),
        if field(r, &["processed"]) == "true" { "yes" } else { "no" },
        attr(src),
        attr(&id),
    );
    html.push_str(&input(data, "first_name", "First Name", "text"));
    html.push_str(&input(data, "last_name", "Last Name", "text"));
    html.push_str(&input(data, "email", "Email", "email"));
    html.push_str(&input(data, "phone", "Phone", "text"));
    let _ = write!(
        html,
        "<button type=\"submit\">Save</button></form>\
         <p class=\"actions\">\
         <a href=\"/admin/process-reservation/{src}/{id}\">Mark as Processed</a> \
         <a class=\"danger\" href=\"/admin/delete-reservation/{src}/{id}\">Delete</a> \
         <a href=\"/admin/reservations-{back}\">Cancel</a></p>\n",
        src = attr(src),
        id = attr(&id),
        back = if src == "new" { "new" } else { "all" },
    );
    html
}

fn admin_calendar(data: &TemplateData) -> String {
    let calendar = data.value("calendar");
    let mut html = String::new();
    let _ = write!(
        html,
        "<h1>Reservation Calendar</h1><div class=\"month-nav\">\
         <a href=\"/admin/reservations-calendar?y={}&amp;m={}\">&lt;&lt;</a> \
         <strong>{}</strong> \
         <a href=\"/admin/reservations-calendar?y={}&amp;m={}\">&gt;&gt;</a></div>\
         <form method=\"post\" action=\"/admin/reservations-calendar\">\
         <input type=\"hidden\" name=\"y\" value=\"{}\">\
         <input type=\"hidden\" name=\"m\" value=\"{}\">",
        attr(data.string("previous_year")),
        attr(data.string("previous_month")),
        text(data.string("month_label")),
        attr(data.string("next_year")),
        attr(data.string("next_month")),
        attr(data.string("year")),
        attr(data.string("month")),
    );

    let days: Vec<String> = calendar
        .get("days")
        .and_then(Value::as_array)
        .map(|days| days.iter().filter_map(|d| d.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    for room in calendar
        .get("rooms")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let room_id = field(room, &["room", "id"]);
        let _ = write!(
            html,
            "<h2>{}</h2><table class=\"calendar\"><tr>",
            text(&field(room, &["room", "room_name"]))
        );
        for day in &days {
            let _ = write!(html, "<th>{}</th>", text(day.get(8..).unwrap_or(day)));
        }
        html.push_str("</tr><tr>");
        for day in &days {
            html.push_str("<td>");
            let reservation = field(room, &["reservations", day.as_str()]);
            let block = field(room, &["blocks", day.as_str()]);
            if !reservation.is_empty() {
                let _ = write!(
                    html,
                    "<a class=\"reserved\" href=\"/admin/reservations/cal/{}/show\">R</a>",
                    attr(&reservation)
                );
            } else if !block.is_empty() {
                let _ = write!(
                    html,
                    "<label title=\"Remove block\"><input type=\"checkbox\" \
                     name=\"remove_block_{}_{}\" value=\"{}\"></label>",
                    attr(&room_id),
                    attr(day),
                    attr(&block),
                );
            } else {
                let _ = write!(
                    html,
                    "<input type=\"checkbox\" name=\"add_block_{}_{}\" value=\"1\">",
                    attr(&room_id),
                    attr(day),
                );
            }
            html.push_str("</td>");
        }
        html.push_str("</tr></table>");
    }

    html.push_str("<button type=\"submit\">Save Changes</button></form>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_walks_nested_values() {
        let value = json!({ "room": { "id": 2, "room_name": "Major's Suite" } });
        assert_eq!(field(&value, &["room", "id"]), "2");
        assert_eq!(field(&value, &["room", "room_name"]), "Major's Suite");
        assert_eq!(field(&value, &["missing"]), "");
    }

    #[test]
    fn test_calendar_offers_block_checkboxes() {
        let data = TemplateData::new()
            .with_string("year", "2050")
            .with_string("month", "1")
            .with_data(
                "calendar",
                &json!({
                    "days": ["2050-01-01", "2050-01-02", "2050-01-03"],
                    "rooms": [{
                        "room": { "id": 1, "room_name": "General's Quarters" },
                        "reservations": { "2050-01-01": 7 },
                        "blocks": { "2050-01-02": 9 },
                    }],
                }),
            );

        let html = admin_calendar(&data);
        assert!(html.contains("/admin/reservations/cal/7/show"));
        assert!(html.contains("name=\"remove_block_1_2050-01-02\" value=\"9\""));
        assert!(html.contains("name=\"add_block_1_2050-01-03\""));
        assert!(!html.contains("add_block_1_2050-01-01"));
    }
}
