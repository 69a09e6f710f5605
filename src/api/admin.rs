use axum::{
    extract::{Path, Query, RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Datelike;
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::AppState;
use super::error::recover;
use super::pages::render_page;
use crate::domain::{BookingError, check_guest_form};
use crate::forms::Form;
use crate::models::Reservation;
use crate::render::{Template, TemplateData};
use crate::session;

const DASHBOARD: &str = "/admin/dashboard";

/// Where a reservation page was opened from; decides the way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    New,
    All,
    Calendar,
}

impl Source {
    fn parse(value: &str) -> Result<Self, BookingError> {
        match value {
            "new" => Ok(Self::New),
            "all" => Ok(Self::All),
            "cal" => Ok(Self::Calendar),
            other => Err(BookingError::NotFound(format!("Unknown page: {other}"))),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::All => "all",
            Self::Calendar => "cal",
        }
    }

    fn back(self, reservation: Option<&Reservation>) -> String {
        match (self, reservation) {
            (Self::New, _) => "/admin/reservations-new".to_string(),
            (Self::All, _) => "/admin/reservations-all".to_string(),
            (Self::Calendar, Some(r)) => format!(
                "/admin/reservations-calendar?y={}&m={}",
                r.start_date.year(),
                r.start_date.month()
            ),
            (Self::Calendar, None) => "/admin/reservations-calendar".to_string(),
        }
    }
}

fn parse_target(src: &str, id: &str) -> Result<(Source, i32), BookingError> {
    let source = Source::parse(src)?;
    let id = id
        .parse()
        .map_err(|_| BookingError::invalid_input(format!("Invalid reservation id: {id}")))?;
    Ok((source, id))
}

fn guest_form(reservation: &Reservation) -> Form {
    Form::from_pairs([
        ("first_name", reservation.first_name.as_str()),
        ("last_name", reservation.last_name.as_str()),
        ("email", reservation.email.as_str()),
        ("phone", reservation.phone.as_str()),
    ])
}

async fn respond(
    session: &Session,
    result: Result<Response, BookingError>,
    fallback: &str,
) -> Response {
    match result {
        Ok(response) => response,
        Err(e) => recover(session, e, fallback).await,
    }
}

/// GET /admin/dashboard
pub async fn dashboard(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let result = async {
        let new = state.admin.new_reservations().await?;
        let all = state.admin.all_reservations().await?;
        let data = TemplateData::new()
            .with_int("new_reservations", i64::try_from(new.len()).unwrap_or(i64::MAX))
            .with_int("all_reservations", i64::try_from(all.len()).unwrap_or(i64::MAX));
        Ok::<_, BookingError>(render_page(&session, Template::AdminDashboard, data)
            .await?
            .into_response())
    }
    .await;

    respond(&session, result, "/").await
}

/// GET /admin/reservations-new
pub async fn reservations_new(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let result = async {
        let reservations = state.admin.new_reservations().await?;
        let data = TemplateData::new().with_data("reservations", &reservations);
        Ok::<_, BookingError>(render_page(&session, Template::AdminNewReservations, data)
            .await?
            .into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// GET /admin/reservations-all
pub async fn reservations_all(State(state): State<Arc<AppState>>, session: Session) -> Response {
    let result = async {
        let reservations = state.admin.all_reservations().await?;
        let data = TemplateData::new().with_data("reservations", &reservations);
        Ok::<_, BookingError>(render_page(&session, Template::AdminAllReservations, data)
            .await?
            .into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// GET /admin/reservations/{src}/{id}/show
pub async fn show_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> Response {
    let result = async {
        let (source, id) = parse_target(&src, &id)?;
        let reservation = state.admin.reservation(id).await?;
        let data = TemplateData::new()
            .with_string("src", source.as_str())
            .with_form(guest_form(&reservation))
            .with_data("reservation", &reservation);
        Ok::<_, BookingError>(render_page(&session, Template::AdminShowReservation, data)
            .await?
            .into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// POST /admin/reservations/{src}/{id}
pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
    RawForm(body): RawForm,
) -> Response {
    let result = async {
        let (source, id) = parse_target(&src, &id)?;
        let reservation = state.admin.reservation(id).await?;

        match state
            .admin
            .update_reservation(id, Form::from_urlencoded(&body))
            .await
        {
            Ok(()) => {
                session::put_flash(&session, "Changes saved").await?;
                Ok(Redirect::to(&source.back(Some(&reservation))).into_response())
            }
            Err(BookingError::ValidationFailed(_)) => {
                let mut form = Form::from_urlencoded(&body);
                check_guest_form(&mut form);
                let data = TemplateData::new()
                    .with_string("src", source.as_str())
                    .with_form(form)
                    .with_data("reservation", &reservation);
                let html = render_page(&session, Template::AdminShowReservation, data).await?;
                Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
            }
            Err(e) => Err(e),
        }
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// GET /admin/process-reservation/{src}/{id}
pub async fn process_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> Response {
    let result = async {
        let (source, id) = parse_target(&src, &id)?;
        let reservation = state.admin.reservation(id).await?;
        state.admin.process_reservation(id).await?;
        session::put_flash(&session, "Reservation marked as processed").await?;
        let back = source.back(Some(&reservation));
        Ok::<_, BookingError>(Redirect::to(&back).into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// GET /admin/delete-reservation/{src}/{id}
pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> Response {
    let result = async {
        let (source, id) = parse_target(&src, &id)?;
        let reservation = state.admin.reservation(id).await?;
        state.admin.delete_reservation(id).await?;
        session::put_flash(&session, "Reservation deleted").await?;
        let back = source.back(Some(&reservation));
        Ok::<_, BookingError>(Redirect::to(&back).into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub y: Option<String>,
    pub m: Option<String>,
}

/// Year and month from the query, defaulting to the current month.
fn calendar_month(y: Option<&str>, m: Option<&str>) -> Result<(i32, u32), BookingError> {
    let today = chrono::Utc::now().date_naive();
    let year = match y.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map_err(|_| BookingError::invalid_input(format!("Invalid year: {v}")))?,
        None => today.year(),
    };
    let month = match m.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map_err(|_| BookingError::invalid_input(format!("Invalid month: {v}")))?,
        None => today.month(),
    };
    Ok((year, month))
}

/// GET /admin/reservations-calendar?y=&m=
pub async fn calendar(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CalendarQuery>,
) -> Response {
    let result = async {
        let (year, month) = calendar_month(query.y.as_deref(), query.m.as_deref())?;
        let calendar = state.admin.calendar(year, month).await?;

        let data = TemplateData::new()
            .with_string("year", calendar.year().to_string())
            .with_string("month", calendar.month().to_string())
            .with_string("month_label", calendar.first_day.format("%B %Y").to_string())
            .with_string("previous_year", calendar.previous.year().to_string())
            .with_string("previous_month", calendar.previous.month().to_string())
            .with_string("next_year", calendar.next.year().to_string())
            .with_string("next_month", calendar.next.month().to_string())
            .with_data("calendar", &calendar);
        Ok::<_, BookingError>(render_page(&session, Template::AdminCalendar, data)
            .await?
            .into_response())
    }
    .await;

    respond(&session, result, DASHBOARD).await
}

/// POST /admin/reservations-calendar
pub async fn post_calendar(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawForm(body): RawForm,
) -> Response {
    let form = Form::from_urlencoded(&body);
    let back = match calendar_month(Some(form.get("y")), Some(form.get("m"))) {
        Ok((year, month)) => format!("/admin/reservations-calendar?y={year}&m={month}"),
        Err(_) => "/admin/reservations-calendar".to_string(),
    };

    let result = async {
        let changes = state.admin.apply_calendar_changes(&form).await?;
        if changes.rejected.is_empty() {
            session::put_flash(&session, "Changes saved").await?;
        } else if changes.added + changes.removed > 0 {
            session::put_warning(&session, changes.rejected.join("; ")).await?;
        } else {
            session::put_error(&session, changes.rejected.join("; ")).await?;
        }
        Ok::<_, BookingError>(Redirect::to(&back).into_response())
    }
    .await;

    respond(&session, result, &back).await
}
