//! Request body and path helpers

use super::error::{HttpError, HttpResult};
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use std::collections::HashMap;

/// Collect a body, refusing anything over `limit` bytes
pub async fn read_body<B>(body: B, limit: usize) -> HttpResult<Bytes>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(HttpError::PayloadTooLarge(limit))
        }
        Err(e) => Err(HttpError::Body(e.to_string())),
    }
}

/// Decode an `application/x-www-form-urlencoded` body
///
/// The first occurrence of a repeated key wins. Invalid percent-escapes decode
/// lossily instead of failing the request.
pub fn parse_form(body: &[u8]) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for pair in body.split(|b| *b == b'&').filter(|p| !p.is_empty()) {
        let mut kv = pair.splitn(2, |b| *b == b'=');
        let key = decode_component(kv.next().unwrap_or_default());
        let value = decode_component(kv.next().unwrap_or_default());
        fields.entry(key).or_insert(value);
    }

    fields
}

fn decode_component(raw: &[u8]) -> String {
    let spaced: Vec<u8> = raw.iter().map(|b| if *b == b'+' { b' ' } else { *b }).collect();
    String::from_utf8_lossy(&urlencoding::decode_binary(&spaced)).into_owned()
}

/// Path segments below `base`, or `None` if `path` is not `base` itself or
/// one of its sub-paths
///
/// `/dashboard/invoices/7` under `/dashboard` gives `["invoices", "7"]`;
/// `/dashboards` gives `None`.
pub fn segments_under<'a>(path: &'a str, base: &str) -> Option<Vec<&'a str>> {
    let base = base.trim_end_matches('/');
    let rest = path.strip_prefix(base)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(rest.split('/').filter(|s| !s.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_parse_form() {
        let fields = parse_form(b"username=user%40nextmail.com&password=a+b%26c&empty=");
        assert_eq!(fields["username"], "user@nextmail.com");
        assert_eq!(fields["password"], "a b&c");
        assert_eq!(fields["empty"], "");
    }

    #[test]
    fn test_parse_form_first_value_wins() {
        let fields = parse_form(b"status=paid&status=pending&flag");
        assert_eq!(fields["status"], "paid");
        assert_eq!(fields["flag"], "");
    }

    #[test]
    fn test_parse_form_lossy() {
        let fields = parse_form(b"name=%FF%FEok&bad=%zz");
        assert!(fields["name"].ends_with("ok"));
        assert_eq!(fields["bad"], "%zz");
    }

    #[test]
    fn test_segments_under() {
        assert_eq!(segments_under("/dashboard", "/dashboard"), Some(vec![]));
        assert_eq!(segments_under("/dashboard/", "/dashboard"), Some(vec![]));
        assert_eq!(
            segments_under("/dashboard/invoices/7/delete", "/dashboard"),
            Some(vec!["invoices", "7", "delete"])
        );
        assert_eq!(segments_under("/dashboards", "/dashboard"), None);
        assert_eq!(segments_under("/login", "/dashboard"), None);
        assert_eq!(segments_under("/app/x", "/app/"), Some(vec!["x"]));
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let ok = read_body(Full::new(Bytes::from_static(b"12345")), 5).await.unwrap();
        assert_eq!(&ok[..], b"12345");

        let err = read_body(Full::new(Bytes::from_static(b"123456")), 5).await.unwrap_err();
        assert!(matches!(err, HttpError::PayloadTooLarge(5)));
    }
}
