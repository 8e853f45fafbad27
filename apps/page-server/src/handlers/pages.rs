//! Post pages and the path catalog.

use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use folio_core::ports::FetchOptions;
use folio_shared::dto::PathsResponse;

use crate::handlers::PREVIEW_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// GET /api/paths
pub async fn paths(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let catalog = state.enumerator.enumerate().await?;
    Ok(HttpResponse::Ok().json(PathsResponse::from(catalog)))
}

/// Serve one post page.
///
/// Published pages come from the page cache when present and are cached
/// after assembly otherwise. With the preview cookie set the page is always
/// assembled against the preview ref and never cached.
///
/// GET /post/{id}
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if let Some(cookie) = req.cookie(PREVIEW_COOKIE) {
        tracing::debug!(request_id = %request_id.as_str(), id = %id, "Assembling preview page");

        let assembled = state
            .assembler
            .assemble(&id, &FetchOptions::preview(cookie.value()))
            .await?;

        return Ok(HttpResponse::Ok()
            .insert_header((CACHE_CONTROL, "private, no-store"))
            .json(state.render(assembled)));
    }

    let cache_control = public_cache_control(state.assembler.revalidate_after().as_secs());

    if let Some(body) = state.cache.get(&id).await {
        tracing::debug!(request_id = %request_id.as_str(), id = %id, "Page cache hit");
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .insert_header((CACHE_CONTROL, cache_control))
            .body(body));
    }

    if !state.serves(&id) {
        return Err(AppError::NotFound(format!("No post with id {}", id)));
    }

    tracing::debug!(request_id = %request_id.as_str(), id = %id, "Assembling page on demand");

    let assembled = state
        .assembler
        .assemble(&id, &FetchOptions::published())
        .await?;
    let response = state.render(assembled);
    state.store(&id, &response).await;

    Ok(HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, cache_control))
        .json(response))
}

/// Shared caches may serve the page for `secs` and keep serving the stale
/// copy for as long again while it is rebuilt.
fn public_cache_control(secs: u64) -> String {
    format!("public, s-maxage={secs}, stale-while-revalidate={secs}")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::http::header::{LOCATION, SET_COOKIE};
    use actix_web::{App, test, web};
    use folio_core::domain::FallbackPolicy;
    use serde_json::Value;

    use crate::handlers::configure_routes;
    use crate::observability::RequestIdMiddleware;
    use crate::state::AppState;
    use crate::state::tests::test_state;

    async fn get(state: AppState, req: test::TestRequest) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let cache_control = res
            .headers()
            .get("cache-control")
            .map(|v| v.to_str().unwrap().to_string());
        let body = test::read_body(res).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (status, cache_control, json)
    }

    #[actix_web::test]
    async fn test_paths_lists_ids_and_policy() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, _, body) = get(state, test::TestRequest::get().uri("/api/paths")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], "blocking");
        let ids: Vec<&str> = body["ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|id| id.as_str().unwrap())
            .collect();
        for id in ["p1", "p2", "p3"] {
            assert!(ids.contains(&id));
        }
    }

    #[actix_web::test]
    async fn test_show_assembles_page() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, cache_control, body) =
            get(state, test::TestRequest::get().uri("/post/p2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cache_control.as_deref(),
            Some("public, s-maxage=1800, stale-while-revalidate=1800")
        );
        assert_eq!(body["post"]["title"], "Post p2");
        assert_eq!(body["navigation"]["previous"]["id"], "p1");
        assert_eq!(body["navigation"]["next"]["id"], "p3");
        assert_eq!(body["previewMode"], false);
        assert_eq!(body["revalidateAfterSeconds"], 1800);
        assert_eq!(body["embeds"][0]["src"], "https://utteranc.es/client.js");
        assert_eq!(
            body["sectionsHtml"][0]["html"],
            "<p><strong>hello</strong> world</p>"
        );
    }

    #[actix_web::test]
    async fn test_show_serves_cached_page() {
        let state = test_state(FallbackPolicy::Blocking);
        state
            .cache
            .put("p1", r#"{"cached":true}"#, Duration::from_secs(60))
            .await
            .unwrap();

        let (status, cache_control, body) =
            get(state, test::TestRequest::get().uri("/post/p1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(
            cache_control.as_deref(),
            Some("public, s-maxage=1800, stale-while-revalidate=1800")
        );
    }

    #[actix_web::test]
    async fn test_show_caches_assembled_page() {
        let state = test_state(FallbackPolicy::Blocking);
        let cache = state.cache.clone();

        get(state, test::TestRequest::get().uri("/post/p3")).await;

        assert!(cache.get("p3").await.is_some());
    }

    #[actix_web::test]
    async fn test_unknown_id_is_not_found() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, _, body) = get(state, test::TestRequest::get().uri("/post/nope")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[actix_web::test]
    async fn test_unbuilt_id_rejected_without_fallback() {
        let state = test_state(FallbackPolicy::None);
        let (status, _, _) = get(state, test::TestRequest::get().uri("/post/p1")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_built_id_served_without_fallback() {
        let mut state = test_state(FallbackPolicy::None);
        state.prebuild(2).await.unwrap();

        let (status, _, body) = get(state, test::TestRequest::get().uri("/post/p1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["id"], "p1");
    }

    #[actix_web::test]
    async fn test_malformed_document_is_server_error() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, _, _) = get(state, test::TestRequest::get().uri("/post/broken")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_preview_cookie_serves_draft_uncached() {
        let state = test_state(FallbackPolicy::Blocking);
        let cache = state.cache.clone();
        let req = test::TestRequest::get()
            .uri("/post/p2")
            .cookie(actix_web::cookie::Cookie::new("folio_preview", "preview-ref"));

        let (status, cache_control, body) = get(state, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache_control.as_deref(), Some("private, no-store"));
        assert_eq!(body["post"]["title"], "Post p2 (draft)");
        assert_eq!(body["previewMode"], true);
        assert!(cache.get("p2").await.is_none());
    }

    #[actix_web::test]
    async fn test_activate_preview_redirects_with_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(FallbackPolicy::Blocking)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/preview?token=preview-ref")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/post/p2");
        let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("folio_preview=preview-ref"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[actix_web::test]
    async fn test_invalid_preview_token_is_unauthorized() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, _, body) = get(
            state,
            test::TestRequest::get().uri("/api/preview?token=stale-ref"),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token");
    }

    #[actix_web::test]
    async fn test_exit_preview_clears_cookie() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(FallbackPolicy::Blocking)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/exit-preview").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/");
        let cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("folio_preview=;"));
    }

    #[actix_web::test]
    async fn test_health() {
        let state = test_state(FallbackPolicy::Blocking);
        let (status, _, body) = get(state, test::TestRequest::get().uri("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
