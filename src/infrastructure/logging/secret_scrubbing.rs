use regex::{Captures, Regex};
use std::sync::LazyLock;

// Google API keys: AIza...
static GOOGLE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{20,}").expect("valid regex"));

// ?key=... / &key=... in request URLs
static KEY_QUERY_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").expect("valid regex"));

static GOOG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(x-goog-api-key[\x22']?\s*[:=]\s*[\x22']?)[^\x22'\s,}]+").expect("valid regex")
});

static BEARER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.]+").expect("valid regex"));

static TOKEN_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"["']?(?:api_key|apikey|token|secret)["']?\s*[:=]\s*["']?([a-zA-Z0-9\-_\.]{20,})["']?"#,
    )
    .expect("valid regex")
});

/// Remove API keys and tokens from text before it is logged or embedded
/// in fallback output.
pub fn scrub_secrets(message: &str) -> String {
    let scrubbed = GOOGLE_KEY.replace_all(message, "[API_KEY_REDACTED]");
    let scrubbed = KEY_QUERY_PARAM.replace_all(&scrubbed, "${1}[REDACTED]");
    let scrubbed = GOOG_HEADER.replace_all(&scrubbed, "${1}[REDACTED]");
    let scrubbed = BEARER.replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
    TOKEN_FIELD
        .replace_all(&scrubbed, |caps: &Captures| {
            let full_match = &caps[0];
            full_match.find([':', '=']).map_or_else(
                || "[REDACTED]".to_string(),
                |pos| format!("{}[REDACTED]", &full_match[..=pos]),
            )
        })
        .into_owned()
}
