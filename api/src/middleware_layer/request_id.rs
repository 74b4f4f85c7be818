use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{Instrument, info, info_span};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags every request with an id (the caller's `X-Request-Id`, or a new
/// `req-<nanos>`), runs it inside a span carrying that id and echoes the id
/// on the response.
pub async fn request_id(req: Request, next: Next) -> Response {
    let id = incoming_id(&req).unwrap_or_else(new_id);
    let span = info_span!(
        "http",
        request_id = %id.to_str().unwrap_or_default(),
        method = %req.method(),
        path = %req.uri().path()
    );

    async move {
        let started = Instant::now();
        let mut res = next.run(req).await;
        info!(
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request finished"
        );
        res.headers_mut().insert(REQUEST_ID_HEADER, id);
        res
    }
    .instrument(span)
    .await
}

fn incoming_id(req: &Request) -> Option<HeaderValue> {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|v| v.to_str().is_ok_and(|s| !s.trim().is_empty()))
        .cloned()
}

fn new_id() -> HeaderValue {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    HeaderValue::from_str(&format!("req-{nanos}")).unwrap_or(HeaderValue::from_static("req-0"))
}
