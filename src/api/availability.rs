use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, RawForm, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::error;

use super::AppState;
use super::error::recover;
use super::pages::{page, render_page};
use crate::domain::{BookingError, DraftReservation};
use crate::forms::Form;
use crate::models::{DateRange, parse_date};
use crate::render::{Template, TemplateData};
use crate::session;

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub ok: bool,
    pub message: String,
    pub room_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl AvailabilityResponse {
    fn failure(message: &str) -> Self {
        Self {
            ok: false,
            message: message.to_string(),
            room_id: String::new(),
            start_date: String::new(),
            end_date: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookRoomQuery {
    pub id: Option<String>,
    pub s: Option<String>,
    pub e: Option<String>,
}

/// GET /search-availability
pub async fn search_page(session: Session) -> Response {
    page(&session, Template::SearchAvailability, TemplateData::new()).await
}

/// POST /search-availability
pub async fn post_search(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawForm(body): RawForm,
) -> Response {
    let form = Form::from_urlencoded(&body);
    match search(&state, &session, form).await {
        Ok(response) => response,
        Err(e) => recover(&session, e, "/search-availability").await,
    }
}

async fn search(state: &AppState, session: &Session, form: Form) -> Result<Response, BookingError> {
    let (range, rooms) = state
        .availability
        .search(form.get("start"), form.get("end"))
        .await?;

    if rooms.is_empty() {
        session::put_error(session, "No availability").await?;
        return Ok(Redirect::to("/search-availability").into_response());
    }

    session::save_draft(session, &DraftReservation::searched(range)).await?;

    let data = TemplateData::new()
        .with_data("rooms", &rooms)
        .with_data("reservation", &DraftReservation::searched(range));
    Ok(render_page(session, Template::ChooseRoom, data)
        .await?
        .into_response())
}

/// POST /search-availability-json
///
/// Always answers with JSON, including for malformed input, so the body is
/// read as raw bytes whatever the content type.
pub async fn availability_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<AvailabilityResponse> {
    let form = Form::from_urlencoded(&body);
    let start = form.get("start").trim();
    let end = form.get("end").trim();

    let Ok(start_date) = parse_date(start, "start") else {
        return Json(AvailabilityResponse::failure("Error: Invalid start date"));
    };
    let Ok(end_date) = parse_date(end, "end") else {
        return Json(AvailabilityResponse::failure("Error: Invalid end date"));
    };
    let Ok(room_id) = form.get("room_id").trim().parse::<i32>() else {
        return Json(AvailabilityResponse::failure("Error: Invalid room ID"));
    };

    let range = match DateRange::new(start_date, end_date) {
        Ok(range) => range,
        Err(e) => return Json(AvailabilityResponse::failure(&e.user_message())),
    };

    match state.availability.room_is_available(room_id, &range).await {
        Ok(available) => Json(AvailabilityResponse {
            ok: available,
            message: String::new(),
            room_id: room_id.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }),
        Err(e) => {
            error!(error = %e, room_id, "Availability check failed");
            Json(AvailabilityResponse::failure("Error connecting to Database"))
        }
    }
}

/// GET /choose-room/{id}
pub async fn choose_room(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    match choose(&state, &session, &id).await {
        Ok(response) => response,
        Err(e) => recover(&session, e, "/").await,
    }
}

async fn choose(state: &AppState, session: &Session, id: &str) -> Result<Response, BookingError> {
    let room_id: i32 = id
        .parse()
        .map_err(|_| BookingError::invalid_input(format!("Invalid room id: {id}")))?;

    let mut draft = session::require_draft(session).await?;
    let room = state.availability.room(room_id).await?;
    draft.choose_room(room);
    session::save_draft(session, &draft).await?;

    Ok(Redirect::to("/make-reservation").into_response())
}

/// GET /book-room?id=&s=&e=
pub async fn book_room(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<BookRoomQuery>,
) -> Response {
    match book(&state, &session, &query).await {
        Ok(response) => response,
        Err(e) => recover(&session, e, "/").await,
    }
}

async fn book(
    state: &AppState,
    session: &Session,
    query: &BookRoomQuery,
) -> Result<Response, BookingError> {
    let id = query.id.as_deref().unwrap_or_default();
    let room_id: i32 = id
        .parse()
        .map_err(|_| BookingError::invalid_input(format!("Invalid room id: '{id}'")))?;
    let range = DateRange::parse(
        query.s.as_deref().unwrap_or_default(),
        query.e.as_deref().unwrap_or_default(),
    )?;

    let room = state.availability.room(room_id).await?;
    session::save_draft(session, &DraftReservation::for_room(range, room)).await?;

    Ok(Redirect::to("/make-reservation").into_response())
}
