use serde_json::Value;

use super::redact::redact_token_fields;

/// Runs `log_action` with a compact, token-redacted rendering of `value` when INFO is enabled.
pub(crate) fn with_redacted_json_info<F>(value: &Value, log_action: F)
where
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::INFO) {
        return;
    }

    let mut redacted = value.clone();
    redact_token_fields(&mut redacted);
    let rendered = serde_json::to_string(&redacted)
        .unwrap_or_else(|error| format!("<serialize failed: {error}>"));
    log_action(rendered.as_str());
}
