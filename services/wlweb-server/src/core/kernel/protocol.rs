//! Text protocol spoken with a kernel over stdin/stdout
//!
//! Every request is a single line of kernel input tagged with a sequence
//! number. The kernel answers by writing one line `<wlweb-reply:SEQ>`
//! followed by a compact JSON object `{"Result": ..., "Messages": [...]}`.
//! Anything else the kernel prints (banners, messages, `Print` output) is
//! noise. The sequence number lets a session discard the late reply of a
//! request whose caller went away.

use crate::core::error::{Result, WlwebError};
use crate::core::expr::Expr;
use crate::core::kernel::Evaluation;
use crate::core::wl;

/// Prefix identifying reply lines on kernel stdout
pub const REPLY_MARKER: &str = "<wlweb-reply:";

/// A reply line read back from the kernel
#[derive(Debug)]
pub struct Reply {
    pub seq: u64,
    pub evaluation: Result<Evaluation>,
}

/// Tag written in front of the reply to request `seq`
pub fn reply_tag(seq: u64) -> String {
    format!("{REPLY_MARKER}{seq}>")
}

const RESULT_SYMBOL: &str = "wlweb`Private`result";

/// Wrap `expr` so the kernel reports its result as one reply line
pub fn encode_request(seq: u64, expr: &Expr) -> String {
    let result = Expr::symbol(RESULT_SYMBOL);
    let message_list = Expr::symbol("$MessageList");

    let payload = Expr::association([
        (
            "Result",
            Expr::call(
                "If",
                vec![
                    Expr::call("StringQ", vec![result.clone()]),
                    result.clone(),
                    Expr::call("ToString", vec![result.clone(), Expr::symbol("InputForm")]),
                ],
            ),
        ),
        (
            "Messages",
            Expr::call("Map", vec![Expr::symbol("ToString"), message_list.clone()]),
        ),
    ]);

    let write = Expr::call(
        "WriteString",
        vec![
            Expr::string("stdout"),
            Expr::string(reply_tag(seq)),
            wl::export_json(payload),
            Expr::string("\n"),
        ],
    );

    let guarded = Expr::call("CheckAbort", vec![expr.clone(), Expr::symbol("$Aborted")]);
    let body = wl::module(vec![wl::set(result, guarded)], write);
    let block = Expr::call(
        "Block",
        vec![
            Expr::list(vec![wl::set(message_list, Expr::list(vec![]))]),
            body,
        ],
    );

    format!("{block};\n")
}

/// Parse a stdout line; `None` when it is not a reply
pub fn parse_reply(line: &str) -> Option<Reply> {
    let payload = line.trim_end_matches(['\r', '\n']);
    let tagged = payload.strip_prefix(REPLY_MARKER)?;
    let (seq, json) = tagged.split_once('>')?;
    let seq = seq.parse().ok()?;

    let evaluation = serde_json::from_str::<Evaluation>(json).map_err(|e| {
        WlwebError::InvalidKernelResponse(format!("malformed reply payload: {e}"))
    });

    Some(Reply { seq, evaluation })
}

/// Input that asks the kernel to exit
pub fn quit_request() -> &'static str {
    "Quit[]\n"
}
