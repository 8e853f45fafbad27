//! Preview mode switches.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use folio_shared::dto::PreviewQuery;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Cookie holding the preview ref while preview mode is on.
pub const PREVIEW_COOKIE: &str = "folio_preview";

/// Turn preview mode on and send the editor to the previewed post.
///
/// GET /api/preview?token=...&documentId=...
pub async fn activate(
    state: web::Data<AppState>,
    query: web::Query<PreviewQuery>,
) -> AppResult<HttpResponse> {
    let PreviewQuery { token, document_id } = query.into_inner();

    let id = state
        .content
        .resolve_preview(&token, document_id.as_deref())
        .await?;

    tracing::info!(id = %id, "Preview mode enabled");

    let cookie = Cookie::build(PREVIEW_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, format!("/post/{}", id)))
        .cookie(cookie)
        .finish())
}

/// GET /api/exit-preview
pub async fn exit() -> HttpResponse {
    let mut cookie = Cookie::build(PREVIEW_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header((LOCATION, "/"))
        .cookie(cookie)
        .finish()
}
