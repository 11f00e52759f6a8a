//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, dispatching and access logging.

use crate::config::AppState;
use crate::handler::{page, upload};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const PAGE_PATH: &str = "/";
pub const UPLOAD_PATH: &str = "/upload";
const LIVENESS_PATH: &str = "/healthz";
const READINESS_PATH: &str = "/readyz";

const PAGE_ALLOW: &str = "GET, HEAD, OPTIONS";
const UPLOAD_ALLOW: &str = "POST, OPTIONS";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::from_request(&req, peer_addr);

    let mut response = route_request(req, &state).await;
    http::apply_common_headers(&mut response, &state.config.http);

    if state.config.logging.access_log {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
    };

    match (&method, ctx.path) {
        (&Method::OPTIONS, path) => {
            let allow = if path == UPLOAD_PATH { UPLOAD_ALLOW } else { PAGE_ALLOW };
            http::build_options_response(allow, state.config.http.enable_cors)
        }
        (&Method::GET | &Method::HEAD, PAGE_PATH) => page::serve_upload_page(&ctx),
        (&Method::GET | &Method::HEAD, LIVENESS_PATH | READINESS_PATH) => {
            http::build_health_response("ok")
        }
        (&Method::POST, UPLOAD_PATH) => upload::serve_upload(req, state).await,
        (method, PAGE_PATH) => {
            logger::log_warning(&format!("Method not allowed: {method} {PAGE_PATH}"));
            http::build_405_response(PAGE_ALLOW)
        }
        (method, UPLOAD_PATH) => {
            logger::log_warning(&format!("Method not allowed: {method} {UPLOAD_PATH}"));
            http::build_405_response(UPLOAD_ALLOW)
        }
        _ => http::build_404_response(),
    }
}
