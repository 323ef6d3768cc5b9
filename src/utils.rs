pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=604800;{secure_attr} Path=/; SameSite=Lax")
}

pub fn expired_cookie(name: &str, secure: bool) -> String {
    let secure_attr = if secure { " Secure;" } else { "" };
    format!("{name}=; HttpOnly; Max-Age=0;{secure_attr} Path=/; SameSite=Lax")
}

/// Percent-encodes a value for embedding in a redirect query string.
pub fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Builds a redirect target carrying a single query-string message.
pub fn redirect_with(path: &str, key: &str, message: &str) -> String {
    format!("{path}?{key}={}", urlencode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapes_reserved_characters() {
        assert_eq!(urlencode("abc-123_~."), "abc-123_~.");
        assert_eq!(urlencode("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(urlencode("Grüezi!"), "Gr%C3%BCezi%21");
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = cookie("user_session", "abc", true);
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.starts_with("user_session=abc;"));

        let insecure = super::cookie("user_session", "abc", false);
        assert!(!insecure.contains("Secure"));
    }
}
