//! HTTP surface: the home page and the placeholder endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::interpret::{interpret, Interpretation};
use crate::ports::{ImageRenderer, PlaceholderRequest};

const HOME_PAGE: &str = include_str!("../static/home.html");

/// Immutable state shared by all requests.
pub struct AppState {
    /// Renderer used for every image request.
    pub renderer: Box<dyn ImageRenderer>,
    /// Answer renderer failures with 502 instead of an empty 200.
    pub strict: bool,
}

/// Build the application router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/*path", get(placeholder))
        .with_state(state)
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn placeholder(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let raw = uri.path();
    let path = decode_path(raw.strip_prefix('/').unwrap_or(raw));
    // The first `text` wins when the parameter repeats.
    let text = query.iter().find(|(key, _)| key == "text").map(|(_, value)| value.as_str());

    match interpret(&path, text) {
        Ok(Interpretation::HomePage) => Html(HOME_PAGE).into_response(),
        Ok(Interpretation::Image(request)) => render(&state, &path, &request).await,
        Err(e) if e.is_client_error() => {
            log::warn!("rejecting /{path}: {e}");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            log::error!("interpreting /{path}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Percent-decode a URL path. Invalid escapes stay as written and invalid
/// UTF-8 becomes U+FFFD.
fn decode_path(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                #[allow(clippy::cast_possible_truncation)]
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Render and wrap the bytes with the format's content type.
///
/// Renderer failures yield an empty body with status 200 unless `strict`.
async fn render(state: &AppState, path: &str, request: &PlaceholderRequest) -> Response {
    let mime_type = request.format.mime_type();
    let data = match state.renderer.render(request).await {
        Ok(image) => image.data,
        Err(e) => {
            log::warn!("rendering /{path} failed: {e}");
            if state.strict {
                return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
            }
            Vec::new()
        }
    };
    ([(header::CONTENT_TYPE, mime_type)], data).into_response()
}
