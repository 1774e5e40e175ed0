use super::SharedState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hospitality_core::edge::{Decision, RequestAttributes, Verdict};

/// Header value as text; only bytes that are not UTF-8 count as missing
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
}

/// Run the edge filter before any route handler
///
/// Denied requests get a minimal static body and never reach the router.
pub async fn filter(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    if !state.config.edge.enabled || state.policy.is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let verdict = {
        let headers = request.headers();
        let attributes = RequestAttributes {
            country: header_str(headers, &state.config.edge.country_header),
            client_identity: header_str(headers, header::USER_AGENT.as_str()),
            path: request.uri().path(),
        };
        state.policy.evaluate(&attributes)
    };

    match verdict {
        Verdict {
            decision: Decision::Allow,
            ..
        } => next.run(request).await,
        Verdict { decision, check } => {
            log::info!(
                "edge filter denied {} {} ({:?} via {:?})",
                request.method(),
                request.uri().path(),
                decision,
                check
            );
            deny(decision)
        }
    }
}

fn deny(decision: Decision) -> Response {
    let status = decision
        .status_code()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::FORBIDDEN);
    let body = decision.body().unwrap_or("Access denied.");

    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
