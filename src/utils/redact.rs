use serde_json::Value;

pub const REDACTED: &str = "[REDACTED]";

/// Keys whose values are credentials in Strava token payloads.
const TOKEN_KEYS: [&str; 2] = ["access_token", "refresh_token"];

/// Replaces credential values anywhere in a JSON document.
pub fn redact_token_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if TOKEN_KEYS.contains(&key.as_str()) {
                    *inner = Value::String(REDACTED.to_string());
                } else {
                    redact_token_fields(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_token_fields),
        _ => {}
    }
}

/// Scrubs known secret strings out of free text before it is logged or returned.
#[derive(Default)]
pub struct Redactor<'a> {
    secrets: Vec<&'a str>,
}

impl<'a> Redactor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn secret(mut self, secret: &'a str) -> Self {
        if !secret.trim().is_empty() {
            self.secrets.push(secret);
            // Longest first; overlapping secrets are replaced whole.
            self.secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
        }
        self
    }

    pub fn scrub(&self, text: &str) -> String {
        self.secrets
            .iter()
            .fold(text.to_string(), |acc, secret| acc.replace(secret, REDACTED))
    }
}

/// Keeps at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.char_indices()
        .nth(max_chars)
        .map(|(idx, _)| format!("{}...<truncated>", &text[..idx]))
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_fields_are_redacted_recursively() {
        let mut payload = json!({
            "token_type": "Bearer",
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "athlete": { "id": 7, "nested": [{ "access_token": "at-2" }] }
        });

        redact_token_fields(&mut payload);

        assert_eq!(payload["access_token"], REDACTED);
        assert_eq!(payload["refresh_token"], REDACTED);
        assert_eq!(payload["athlete"]["nested"][0]["access_token"], REDACTED);
        assert_eq!(payload["athlete"]["id"], 7);
        assert_eq!(payload["token_type"], "Bearer");
    }

    #[test]
    fn redactor_scrubs_every_secret_and_ignores_blank_ones() {
        let redactor = Redactor::new().secret("cs-123").secret("").secret("code-9");
        let out = redactor.scrub("client_secret=cs-123&code=code-9&again=cs-123");
        assert_eq!(
            out,
            "client_secret=[REDACTED]&code=[REDACTED]&again=[REDACTED]"
        );
    }

    #[test]
    fn prefix_secret_does_not_leave_longer_tail() {
        let redactor = Redactor::new().secret("abc").secret("abcdef");
        assert_eq!(redactor.scrub("code=abcdef secret=abc"), "code=[REDACTED] secret=[REDACTED]");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...<truncated>");
    }
}
