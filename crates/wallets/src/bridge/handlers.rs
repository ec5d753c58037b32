use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse},
};

use super::{
    app::contents,
    state::BridgeState,
    types::{BridgeRequest, BridgeResponse, BrowserApiResponse, PageStatus},
};
use crate::discovery::ProviderInfo;

pub(crate) async fn serve_index(State(state): State<Arc<BridgeState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    (headers, Html(contents::render(&state.session_token())))
}

/// Hands the next queued request to the page.
pub(crate) async fn get_next_request(
    State(state): State<Arc<BridgeState>>,
) -> Json<BrowserApiResponse<BridgeRequest>> {
    match state.take_request() {
        Some(request) => Json(BrowserApiResponse::Ok(request)),
        None => Json(BrowserApiResponse::error("No pending request")),
    }
}

pub(crate) async fn post_response(
    State(state): State<Arc<BridgeState>>,
    Json(response): Json<BridgeResponse>,
) -> Json<BrowserApiResponse<()>> {
    if !state.add_response(response) {
        return Json(BrowserApiResponse::error("Unknown request id"));
    }
    Json(BrowserApiResponse::ok())
}

/// Receives an `eip6963:announceProvider` event the page observed.
pub(crate) async fn post_announce(
    State(state): State<Arc<BridgeState>>,
    Json(info): Json<ProviderInfo>,
) -> Json<BrowserApiResponse<()>> {
    state.announce(info);
    Json(BrowserApiResponse::ok())
}

pub(crate) async fn post_page_status(
    State(state): State<Arc<BridgeState>>,
    Json(status): Json<PageStatus>,
) -> Json<BrowserApiResponse<()>> {
    state.set_page_status(status);
    Json(BrowserApiResponse::ok())
}
