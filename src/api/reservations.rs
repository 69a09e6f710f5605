use axum::{
    extract::{RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;

use super::AppState;
use super::error::recover;
use super::pages::render_page;
use crate::domain::{
    BookingError, BookingStage, DraftReservation, check_guest_form, guest_from_form,
};
use crate::forms::Form;
use crate::render::{Template, TemplateData};
use crate::session;

/// Loads a draft that already has a room.
async fn draft_with_room(session: &Session) -> Result<DraftReservation, BookingError> {
    let draft = session::require_draft(session).await?;
    match draft.stage() {
        BookingStage::RoomChosen | BookingStage::DetailsEntered => Ok(draft),
        _ => Err(BookingError::SessionMissing),
    }
}

fn form_from_draft(draft: &DraftReservation) -> Form {
    let guest = draft.guest.clone().unwrap_or_default();
    Form::from_pairs([
        ("first_name", guest.first_name),
        ("last_name", guest.last_name),
        ("email", guest.email),
        ("phone", guest.phone),
    ])
}

/// GET /make-reservation
pub async fn form(session: Session) -> Response {
    let result = async {
        let draft = draft_with_room(&session).await?;
        let data = TemplateData::new()
            .with_form(form_from_draft(&draft))
            .with_data("reservation", &draft);
        render_page(&session, Template::MakeReservation, data).await
    }
    .await;

    match result {
        Ok(html) => html.into_response(),
        Err(e) => recover(&session, e, "/").await,
    }
}

/// POST /make-reservation
pub async fn submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawForm(body): RawForm,
) -> Response {
    let mut draft = match draft_with_room(&session).await {
        Ok(draft) => draft,
        Err(e) => return recover(&session, e, "/").await,
    };

    let mut form = Form::from_urlencoded(&body);
    draft.enter_details(guest_from_form(&form));

    if !check_guest_form(&mut form) {
        let rendered = async {
            session::save_draft(&session, &draft).await?;
            let data = TemplateData::new()
                .with_form(form)
                .with_data("reservation", &draft);
            render_page(&session, Template::MakeReservation, data).await
        }
        .await;

        return match rendered {
            Ok(html) => (StatusCode::UNPROCESSABLE_ENTITY, html).into_response(),
            Err(e) => recover(&session, e, "/").await,
        };
    }

    match commit(&state, &session, &draft).await {
        Ok(response) => response,
        Err(e) => {
            // A failed write restarts the flow from a clean session.
            if let Err(clear_err) = session::clear_draft(&session).await {
                return recover(&session, clear_err, "/").await;
            }
            recover(&session, e, "/").await
        }
    }
}

async fn commit(
    state: &AppState,
    session: &Session,
    draft: &DraftReservation,
) -> Result<Response, BookingError> {
    let new = draft.to_new_reservation()?;
    let committed = state.writer.create_reservation(&new).await?;

    session::clear_draft(session).await?;
    session::save_summary(session, &committed).await?;
    info!(reservation_id = committed.id, "Booking flow completed");

    Ok(Redirect::to("/reservation-summary").into_response())
}

/// GET /reservation-summary
pub async fn summary(session: Session) -> Response {
    let result = async {
        let committed = session::take_summary(&session)
            .await?
            .ok_or(BookingError::SessionMissing)?;
        let data = TemplateData::new().with_data("reservation", &committed);
        render_page(&session, Template::ReservationSummary, data).await
    }
    .await;

    match result {
        Ok(html) => html.into_response(),
        Err(e) => recover(&session, e, "/").await,
    }
}
