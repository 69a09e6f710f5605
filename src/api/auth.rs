use axum::{
    extract::{RawForm, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{info, warn};

use super::error::recover;
use super::observability::AuthenticatedUser;
use super::pages::{page, render_page};
use super::{ApiError, AppState};
use crate::domain::BookingError;
use crate::forms::Form;
use crate::render::{Template, TemplateData};
use crate::session;

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through only when the session carries a user id that
/// still resolves to a user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let user_id = match session::user_id(&session).await {
        Ok(user_id) => user_id,
        Err(e) => return ApiError::internal(e.to_string()).into_response(),
    };

    if let Some(id) = user_id {
        match state.auth.current_user(id).await {
            Ok(_) => {
                let mut response = next.run(request).await;
                response.extensions_mut().insert(AuthenticatedUser(id));
                return response;
            }
            Err(BookingError::NotFound(_)) => {
                warn!(user_id = id, "Session refers to a missing user");
            }
            Err(e) => return recover(&session, e, "/").await,
        }
    }

    recover(
        &session,
        BookingError::invalid_input("Log in first!"),
        "/user/login",
    )
    .await
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /user/login
pub async fn login_page(session: Session) -> Response {
    page(&session, Template::Login, TemplateData::new()).await
}

/// POST /user/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawForm(body): RawForm,
) -> Response {
    let mut form = Form::from_urlencoded(&body);
    form.required(&["email", "password"]).is_email("email");

    if !form.valid() {
        let data = TemplateData::new().with_form(form);
        return match render_page(&session, Template::Login, data).await {
            Ok(html) => (StatusCode::UNPROCESSABLE_ENTITY, html).into_response(),
            Err(e) => ApiError::internal(e.to_string()).into_response(),
        };
    }

    let email = form.get("email").trim();
    let user = match state.auth.login(email, form.get("password")).await {
        Ok(user) => user,
        Err(e) => return recover(&session, e, "/user/login").await,
    };

    let result = async {
        session::log_in(&session, user.id).await?;
        session::put_flash(&session, "Logged in successfully").await
    }
    .await;

    if let Err(e) = result {
        return recover(&session, e, "/user/login").await;
    }

    info!(user_id = user.id, "User logged in");
    Redirect::to("/admin/dashboard").into_response()
}

/// GET /user/logout
pub async fn logout(session: Session) -> Response {
    if let Err(e) = session::log_out(&session).await {
        return ApiError::internal(e.to_string()).into_response();
    }
    Redirect::to("/user/login").into_response()
}
