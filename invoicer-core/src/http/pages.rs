//! Server-rendered HTML pages

use crate::auth::LoginState;

/// Escape text for HTML element and attribute content
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn home_page(login_path: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Invoicer</title></head>
<body>
<h1>Invoicer</h1>
<p>Create, track and settle customer invoices.</p>
<p><a href="{}">Log in</a></p>
</body></html>"#,
        escape_html(login_path)
    )
}

/// Login form with at most one message
///
/// The submitted username is echoed back; the password never is.
pub fn login_page(action: &str, state: &LoginState, username: &str) -> String {
    let message = match state.message() {
        Some(msg) => format!(r#"<p role="alert">{}</p>"#, escape_html(msg)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Log in - Invoicer</title></head>
<body>
<h1>Please log in to continue.</h1>
<form method="post" action="{action}">
<label for="username">Username</label>
<input id="username" name="username" type="text" value="{username}" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<button type="submit">Log in</button>
</form>
{message}
</body></html>"#,
        action = escape_html(action),
        username = escape_html(username),
        message = message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RejectReason;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_idle_login_has_no_message() {
        let html = login_page("/login", &LoginState::Idle, "");
        assert!(html.contains(r#"action="/login""#));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn test_rejected_login_shows_one_message() {
        let html = login_page(
            "/login",
            &LoginState::Rejected(RejectReason::InvalidCredentials),
            "<script>",
        );
        assert_eq!(html.matches("role=\"alert\"").count(), 1);
        assert!(html.contains("Invalid credentials."));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
