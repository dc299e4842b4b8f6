// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured blocking HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Build a header map from a static `(name, value)` table.
pub fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AppError::invalid(format!("header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AppError::invalid(format!("header value for '{name}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Send a request; a non-success status is an error.
pub fn send_ok(request: RequestBuilder) -> Result<Response> {
    Ok(request.send()?.error_for_status()?)
}

/// Send a request and return the body of a successful response.
pub fn send_text(request: RequestBuilder) -> Result<String> {
    Ok(send_ok(request)?.text()?)
}

/// Send a request and parse the body of a successful response as JSON.
pub fn send_json(request: RequestBuilder) -> Result<serde_json::Value> {
    let text = send_text(request)?;
    Ok(serde_json::from_str(&text)?)
}

/// Fetch a page with the given headers and return its body.
pub fn fetch_text(client: &Client, url: &str, headers: &[(&str, &str)]) -> Result<String> {
    log::debug!("GET {url}");
    send_text(client.get(url).headers(header_map(headers)?))
}

/// Fetch a page and parse it as HTML.
pub fn fetch_page(client: &Client, url: &str, headers: &[(&str, &str)]) -> Result<Html> {
    let text = fetch_text(client, url, headers)?;
    Ok(Html::parse_document(&text))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve one request with the given status line and return the URL.
    fn serve_once(status: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response =
                format!("HTTP/1.1 {status}\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}");
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/")
    }

    #[test]
    fn test_send_ok_rejects_error_status() {
        let client = Client::builder().no_proxy().build().unwrap();
        let url = serve_once("403 Forbidden");
        let result = send_ok(client.get(&url));
        assert!(matches!(result, Err(AppError::Http(e)) if e.status() == Some(reqwest::StatusCode::FORBIDDEN)));
    }

    #[test]
    fn test_send_ok_passes_success() {
        let client = Client::builder().no_proxy().build().unwrap();
        let url = serve_once("200 OK");
        let response = send_ok(client.get(&url)).unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().unwrap(), "{}");
    }

    #[test]
    fn test_header_map_from_table() {
        let map = header_map(&[("accept", "*/*"), ("sec-gpc", "1")]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["accept"], "*/*");
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let result = header_map(&[("bad header", "x")]);
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_create_client_from_default_config() {
        assert!(create_client(&HttpConfig::default()).is_ok());
    }
}
