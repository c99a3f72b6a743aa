//! Request conversion
//!
//! Builds the association `GenerateHTTPResponse` expects from an
//! incoming request. Form submissions become `MultipartElements`;
//! uploaded files are spooled to temporary files the kernel reads by
//! name, so they must outlive the evaluation.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{header, HeaderMap, Method, Request, Uri},
    Form,
};
use tempfile::NamedTempFile;

use crate::core::error::{Result, WlwebError};
use crate::core::expr::Expr;

/// Kernel view of a request, with the upload files it references
#[derive(Debug)]
pub struct KernelRequest {
    pub expr: Expr,
    pub uploads: Vec<NamedTempFile>,
}

/// Convert an HTTP request into its kernel association
pub async fn request_to_expr(request: Request<Body>) -> Result<KernelRequest> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = request.headers().clone();
    let (domain, port) = host_and_port(&uri, &headers);

    let mut entries: Vec<(&str, Expr)> = vec![
        ("Method", Expr::string(method.as_str())),
        ("Scheme", Expr::string(uri.scheme_str().unwrap_or("http"))),
        ("Domain", Expr::string(domain)),
        ("Port", Expr::from(port)),
        ("PathString", Expr::string(uri.path())),
        ("QueryString", Expr::string(uri.query().unwrap_or(""))),
        ("Headers", header_rules(&headers)),
    ];

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let has_body = !matches!(method, Method::GET | Method::HEAD);

    let mut uploads = Vec::new();
    if has_body && content_type.starts_with("multipart/form-data") {
        let elements = multipart_elements(request, &mut uploads).await?;
        entries.push(("MultipartElements", Expr::list(elements)));
    } else if has_body && content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?;
        let elements = fields
            .into_iter()
            .map(|(name, value)| Expr::rule(name, in_memory_element(value)))
            .collect();
        entries.push(("MultipartElements", Expr::list(elements)));
    } else {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?;
        if !body.is_empty() {
            entries.push(("BodyByteArray", Expr::bytes(body.to_vec())));
        }
    }

    Ok(KernelRequest {
        expr: Expr::association(entries),
        uploads,
    })
}

async fn multipart_elements(
    request: Request<Body>,
    uploads: &mut Vec<NamedTempFile>,
) -> Result<Vec<Expr>> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?;

    let mut elements = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = field
                .text()
                .await
                .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?;
            elements.push(Expr::rule(name, in_memory_element(value)));
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| WlwebError::InvalidRequest(e.to_string()))?;

        let file = NamedTempFile::new()?;
        tokio::fs::write(file.path(), &data).await?;

        elements.push(Expr::rule(
            name,
            Expr::association([
                (
                    "FileName",
                    Expr::string(file.path().to_string_lossy().into_owned()),
                ),
                ("OriginalFileName", Expr::string(original_name)),
                ("ContentType", Expr::string(content_type)),
                ("InMemory", Expr::from(false)),
            ]),
        ));
        uploads.push(file);
    }

    Ok(elements)
}

fn in_memory_element(value: String) -> Expr {
    Expr::association([
        ("ContentString", Expr::string(value)),
        ("InMemory", Expr::from(true)),
    ])
}

fn header_rules(headers: &HeaderMap) -> Expr {
    Expr::list(
        headers
            .iter()
            .map(|(name, value)| {
                Expr::rule(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    )
}

/// Host and port from the request target, falling back to `Host`
fn host_and_port(uri: &Uri, headers: &HeaderMap) -> (String, u16) {
    if let Some(host) = uri.host() {
        return (host.to_string(), uri.port_u16().unwrap_or(80));
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");

    let (name, port) = match host.strip_prefix('[') {
        // [v6-address]:port
        Some(rest) => match rest.split_once(']') {
            Some((addr, tail)) => (format!("[{addr}]"), tail.strip_prefix(':')),
            None => (host.to_string(), None),
        },
        None => match host.rsplit_once(':') {
            Some((name, port)) => (name.to_string(), Some(port)),
            None => (host.to_string(), None),
        },
    };

    (name, port.and_then(|p| p.parse().ok()).unwrap_or(80))
}
