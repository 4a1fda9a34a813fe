//! Plugin host module
//!
//! Translates inbound HTTP requests into plugin capability calls: the health
//! path invokes the health check, requests under the resource mount are
//! handed to the resource router with the mount prefix stripped, and
//! everything else is a 404.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Request, Response, StatusCode, Uri};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::plugin::{
    CallResourceHandler, CheckHealthHandler, CheckHealthRequest, HealthStatus, ResourceRequest,
};

/// Main entry point for every request on the host listener
pub async fn handle_request<B>(
    req: Request<B>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut entry = AccessLogEntry::start(
        peer,
        req.method(),
        req.uri(),
        req.version(),
        req.headers(),
    );

    let mut resp = match collect_body(req, state.config.http.max_body_size).await {
        Ok(req) => dispatch(&state, req).await,
        Err(resp) => resp,
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        resp.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let body_bytes = resp
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(resp.status().as_u16(), body_bytes);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

/// Buffer the request body, enforcing `max_body_size`
async fn collect_body<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<ResourceRequest, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(size) = declared_length(&req) {
        if size > max_body_size {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(http::build_413_response());
        }
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(Request::from_parts(parts, collected.to_bytes())),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => Err(http::build_error_response(
            StatusCode::BAD_REQUEST,
            &e.to_string(),
        )),
    }
}

fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    let value = req.headers().get(CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(size) => Some(size),
        None => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: {value:?}, skipping size check"
            ));
            None
        }
    }
}

/// Route a buffered request to the matching plugin capability
pub async fn dispatch(state: &AppState, mut req: ResourceRequest) -> Response<Full<Bytes>> {
    let mount = &state.config.plugin;

    if req.uri().path() == mount.health_path {
        return check_health(state, &req).await;
    }

    match strip_mount(&mount.resource_prefix, req.uri()) {
        Some(uri) => {
            *req.uri_mut() = uri;
            state.plugin.call_resource(req).await
        }
        None => http::build_404_response(),
    }
}

async fn check_health(state: &AppState, req: &ResourceRequest) -> Response<Full<Bytes>> {
    let probe = CheckHealthRequest {
        headers: req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
    };
    let result = state.plugin.check_health(&probe).await;
    let status = match result.status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
    };

    match serde_json::to_vec(&result) {
        Ok(json) => http::build_json_response(status, Bytes::from(json)),
        Err(e) => http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// Strip the resource mount from `uri`, keeping the query string.
///
/// Returns `None` when the path is outside the mount.
fn strip_mount(prefix: &str, uri: &Uri) -> Option<Uri> {
    let rest = uri.path().strip_prefix(prefix.trim_end_matches('/'))?;
    if !rest.starts_with('/') {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(q) => format!("{rest}?{q}"),
        None => rest.to_string(),
    };
    Uri::builder().path_and_query(path_and_query).build().ok()
}
