use axum::response::{Html, IntoResponse, Response};
use tower_sessions::Session;

use super::ApiError;
use crate::domain::BookingError;
use crate::render::{Template, TemplateData, render};
use crate::session;

/// Renders `template` with the pending notices and login state of `session`.
pub async fn render_page(
    session: &Session,
    template: Template,
    data: TemplateData,
) -> Result<Html<String>, BookingError> {
    let notices = session::take_notices(session).await?;
    let authenticated = session::user_id(session).await?.is_some();
    Ok(render(
        template,
        &data.with_notices(notices).authenticated(authenticated),
    ))
}

pub async fn page(session: &Session, template: Template, data: TemplateData) -> Response {
    match render_page(session, template, data).await {
        Ok(html) => html.into_response(),
        Err(e) => ApiError::internal(e.to_string()).into_response(),
    }
}

pub async fn home(session: Session) -> Response {
    page(&session, Template::Home, TemplateData::new()).await
}

pub async fn about(session: Session) -> Response {
    page(&session, Template::About, TemplateData::new()).await
}

pub async fn generals_quarters(session: Session) -> Response {
    page(&session, Template::GeneralsQuarters, TemplateData::new()).await
}

pub async fn majors_suite(session: Session) -> Response {
    page(&session, Template::MajorsSuite, TemplateData::new()).await
}

pub async fn contact(session: Session) -> Response {
    page(&session, Template::Contact, TemplateData::new()).await
}
