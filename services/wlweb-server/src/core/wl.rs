//! Builders for the handful of kernel functions wlweb composes
//!
//! Thin wrappers over [`Expr::call`] so call sites read like the
//! kernel code they produce.

use crate::core::expr::Expr;

/// Body of the response returned when nothing is configured to serve
pub const NOT_FOUND_BODY: &str = "<h1>Page not found</h1>";

pub fn get(path: impl Into<Expr>) -> Expr {
    Expr::call("Get", vec![path.into()])
}

/// `Once[expr]`: evaluated at most once per kernel lifetime
pub fn once(expr: Expr) -> Expr {
    Expr::call("Once", vec![expr])
}

pub fn unevaluated(expr: Expr) -> Expr {
    Expr::call("Unevaluated", vec![expr])
}

pub fn compound_expression(exprs: Vec<Expr>) -> Expr {
    Expr::call("CompoundExpression", exprs)
}

/// `HTTPResponse[body, <|"StatusCode" -> status|>]`
pub fn http_response(body: impl Into<Expr>, status: u16) -> Expr {
    Expr::call(
        "HTTPResponse",
        vec![body.into(), Expr::association([("StatusCode", status)])],
    )
}

pub fn generate_http_response(handler: Expr, request: Expr) -> Expr {
    Expr::call("GenerateHTTPResponse", vec![handler, request])
}

pub fn module(locals: Vec<Expr>, body: Expr) -> Expr {
    Expr::call("Module", vec![Expr::list(locals), body])
}

pub fn set(lhs: Expr, rhs: Expr) -> Expr {
    Expr::call("Set", vec![lhs, rhs])
}

/// `ExportString[expr, "RawJSON", "Compact" -> True]`
pub fn export_json(expr: Expr) -> Expr {
    Expr::call(
        "ExportString",
        vec![expr, Expr::string("RawJSON"), Expr::rule("Compact", true)],
    )
}

pub fn base_encode(expr: Expr) -> Expr {
    Expr::call("BaseEncode", vec![expr])
}

/// `expr[key]`, the association/object property accessor
pub fn part_of(expr: Expr, key: &str) -> Expr {
    Expr::apply(expr, vec![Expr::string(key)])
}
