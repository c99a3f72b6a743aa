//! Kernel-backed views
//!
//! [`wl_view`] answers a request with whatever `GenerateHTTPResponse`
//! makes of a handler expression: `APIFunction` and `FormFunction`
//! produce JSON (or an HTML form), strings produce HTML, and an explicit
//! `HTTPResponse` is returned as-is.

use axum::{body::Body, http::Request, response::Response};
use tracing::debug;

use crate::core::error::{Result, WlwebError};
use crate::core::expr::Expr;
use crate::core::kernel::Evaluator;
use crate::core::wl;
use crate::http::request::{request_to_expr, KernelRequest};
use crate::http::response::KernelResponse;

const RESPONSE_SYMBOL: &str = "wlweb`Private`response";

/// Expression generating the response to `request` and exporting it as JSON
pub fn view_expr(handler: Expr, request: Expr) -> Expr {
    let response = Expr::symbol(RESPONSE_SYMBOL);

    let payload = Expr::association([
        ("StatusCode", wl::part_of(response.clone(), "StatusCode")),
        (
            "Headers",
            Expr::call(
                "Apply",
                vec![
                    Expr::symbol("List"),
                    wl::part_of(response.clone(), "Headers"),
                    Expr::list(vec![Expr::integer(1)]),
                ],
            ),
        ),
        (
            "Body",
            wl::base_encode(wl::part_of(response.clone(), "BodyByteArray")),
        ),
    ]);

    wl::module(
        vec![response.clone()],
        wl::compound_expression(vec![
            wl::set(response, wl::generate_http_response(handler, request)),
            wl::export_json(payload),
        ]),
    )
}

/// Evaluate `handler` against `request` and convert the kernel's answer
pub async fn wl_view(
    evaluator: &dyn Evaluator,
    handler: Expr,
    request: Request<Body>,
) -> Result<Response> {
    let KernelRequest { expr, uploads } = request_to_expr(request).await?;

    let evaluation = evaluator.evaluate(&view_expr(handler, expr)).await?;
    // Upload files are read by the kernel during the evaluation
    drop(uploads);

    if !evaluation.is_success() {
        debug!(messages = ?evaluation.messages, "Kernel issued messages");
    }
    if evaluation.result == "$Aborted" {
        return Err(WlwebError::EvaluationFailed("evaluation aborted".into()));
    }

    KernelResponse::from_evaluation(&evaluation)?.into_http()
}
