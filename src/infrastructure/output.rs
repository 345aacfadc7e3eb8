use crate::domain::entities::{Request, Response};
use anyhow::{Result, anyhow};
use http::HeaderMap;
use std::io::Write;

/// Writes response headers to `meta` and the raw body to `out`
///
/// Headers are grouped by name as `Name: v1, v2`, then a blank line separates
/// them from the body. The body is written untouched.
pub fn write_response(
    response: &Response,
    verbose: bool,
    meta: &mut impl Write,
    out: &mut impl Write,
) -> Result<()> {
    if verbose {
        writeln!(meta, "{}", status_line(response))?;
    }
    write_headers(&response.headers, meta)?;
    writeln!(out)?;
    out.write_all(&response.body)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes the body alone to `path`, leaving headers on `meta`
pub fn save_response_body(
    response: &Response,
    path: &std::path::Path,
    meta: &mut impl Write,
) -> Result<()> {
    write_headers(&response.headers, meta)?;
    std::fs::write(path, &response.body)
        .map_err(|e| anyhow!("Failed to write response to {}: {}", path.display(), e))
}

/// Describes a request the way it would go on the wire, for `--offline`
pub fn write_request(request: &Request, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} {}", request.method, request.url)?;
    write_headers(&request.headers, out)?;
    if let Some(body) = &request.body {
        writeln!(out)?;
        out.write_all(body.as_bytes())?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn status_line(response: &Response) -> String {
    match response.status.canonical_reason() {
        Some(reason) => format!("{} {}", response.status.as_u16(), reason),
        None => response.status.as_u16().to_string(),
    }
}

fn write_headers(headers: &HeaderMap, out: &mut impl Write) -> Result<()> {
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        writeln!(out, "{}: {}", name, values.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::builders::request_builder::RequestBuilder;
    use http::{HeaderValue, StatusCode};
    use hyper::body::Bytes;

    fn response() -> Response {
        let mut headers = HeaderMap::new();
        headers.append("content-type", HeaderValue::from_static("text/plain"));
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        Response {
            status: StatusCode::NOT_FOUND,
            headers,
            body: Bytes::from_static(b"missing"),
        }
    }

    #[test]
    fn headers_go_to_meta_and_body_to_out() {
        let (mut meta, mut out) = (Vec::new(), Vec::new());
        write_response(&response(), false, &mut meta, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(meta).unwrap(),
            "content-type: text/plain\nset-cookie: a=1, b=2\n"
        );
        assert_eq!(String::from_utf8(out).unwrap(), "\nmissing\n");
    }

    #[test]
    fn verbose_adds_the_status_line() {
        let (mut meta, mut out) = (Vec::new(), Vec::new());
        write_response(&response(), true, &mut meta, &mut out).unwrap();

        let meta = String::from_utf8(meta).unwrap();
        assert!(meta.starts_with("404 Not Found\n"), "{meta}");
    }

    #[test]
    fn saved_body_lands_in_the_file() {
        let path = std::env::temp_dir().join(format!("hep-output-{}.txt", std::process::id()));
        let mut meta = Vec::new();
        save_response_body(&response(), &path, &mut meta).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"missing");
        assert!(String::from_utf8(meta).unwrap().contains("set-cookie: a=1, b=2"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn offline_request_shows_everything_that_would_be_sent() {
        let request = RequestBuilder::from_tokens(&["PUT", ":9000/x", "Accept:*/*", "n:=1", "q==z"])
            .unwrap()
            .request;
        let mut out = Vec::new();
        write_request(&request, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "PUT http://localhost:9000/x?q=z\naccept: */*\n\n{\"n\":1}\n"
        );
    }
}
