//! Response builders
//!
//! Every handler answers with `Response<Full<Bytes>>`. JSON errors share one
//! shape:
//!
//! ```json
//! { "error": "snake_code", "message": "Human readable detail" }
//! ```

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION, SET_COOKIE};
use hyper::{Response, StatusCode};

pub type Resp = Response<Full<Bytes>>;

pub fn json_response(status: StatusCode, body: &serde_json::Value) -> Resp {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("valid HTTP response")
}

pub fn json_error_response(status: StatusCode, error: &str, message: &str) -> Resp {
    json_response(status, &serde_json::json!({ "error": error, "message": message }))
}

pub fn html_response(status: StatusCode, html: String) -> Resp {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(html)))
        .expect("valid HTTP response")
}

/// Redirect with an empty body
///
/// `location` comes from validated configuration; an unrepresentable value
/// falls back to `/`.
pub fn redirect(status: StatusCode, location: &str) -> Resp {
    let location = HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));
    Response::builder()
        .status(status)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))
        .expect("valid HTTP response")
}

/// 303 after a form submission
pub fn see_other(location: &str) -> Resp {
    redirect(StatusCode::SEE_OTHER, location)
}

/// Append a `Set-Cookie` header
pub fn with_cookie(mut resp: Resp, cookie: &str) -> Resp {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            resp.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => log::error!("Dropping unrepresentable Set-Cookie header: {}", e),
    }
    resp
}

pub fn not_found_response() -> Resp {
    json_error_response(StatusCode::NOT_FOUND, "not_found", "Resource not found")
}

pub fn method_not_allowed_response(allowed: &str) -> Resp {
    let mut resp = json_error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "HTTP method not allowed for this endpoint",
    );
    if let Ok(value) = HeaderValue::from_str(allowed) {
        resp.headers_mut().insert(hyper::header::ALLOW, value);
    }
    resp
}

pub fn payload_too_large_response(limit: usize) -> Resp {
    json_error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "payload_too_large",
        &format!("Request body exceeds {} bytes", limit),
    )
}

/// Generic failure body; detail goes to the log only
pub fn internal_error_response(status: StatusCode) -> Resp {
    json_error_response(status, "internal_server_error", "Something went wrong.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Resp) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_error_shape() {
        let resp = json_error_response(StatusCode::BAD_REQUEST, "bad_request", "say \"hi\"");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");

        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["message"], "say \"hi\"");
    }

    #[test]
    fn test_redirect_with_cookie() {
        let resp = with_cookie(see_other("/dashboard"), "invoicer_session=abc; Path=/");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/dashboard");
        assert_eq!(resp.headers()[SET_COOKIE], "invoicer_session=abc; Path=/");
    }

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let resp = method_not_allowed_response("GET, POST");
        assert_eq!(resp.headers()[hyper::header::ALLOW], "GET, POST");
    }
}
