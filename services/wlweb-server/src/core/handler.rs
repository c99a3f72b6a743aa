//! Handler expressions served by `wlweb serve`

use std::path::Path;

use crate::core::expr::Expr;
use crate::core::wl;

/// Build the fixed expression answered for every request
///
/// Literal expressions come first, then `Get` targets, both in the order
/// given. Without autoreload a target is loaded once per kernel.
pub fn create_handler(expressions: &[String], get: &[String], autoreload: bool) -> Expr {
    let mut exprs: Vec<Expr> = expressions.iter().map(Expr::raw).collect();
    exprs.extend(get.iter().map(|path| {
        let load = wl::get(path.as_str());
        wl::unevaluated(if autoreload { load } else { wl::once(load) })
    }));

    match exprs.len() {
        0 => wl::http_response(wl::NOT_FOUND_BODY, 404),
        1 => exprs.remove(0),
        _ => wl::compound_expression(exprs),
    }
}

/// Expression evaluating a script found in the served folder
pub fn folder_script(path: &Path, autoreload: bool) -> Expr {
    let load = wl::get(path.to_string_lossy().into_owned());
    if autoreload {
        load
    } else {
        wl::once(load)
    }
}
