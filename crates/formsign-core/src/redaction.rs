use once_cell::sync::Lazy;
use regex::Regex;

static RE_KV_SECRET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(x-auth-token|[a-z_]*api[_-]?key|authorization)(["']?)\s*[:=]\s*(["']?)([^\s"',}&]+)(["']?)"#
    ).expect("valid regex")
});

static RE_AUTH_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Authorization)\s*:\s*(Basic|Bearer)\s+([A-Za-z0-9+/=._\-]+)")
        .expect("valid regex")
});

static RE_URL_USERINFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://)[^/@\s]+@").expect("valid regex")
});

/// Redact API keys, auth headers and URL credentials from arbitrary text.
pub fn redact_secrets_in_text(input: &str) -> String {
    let step1 = RE_AUTH_SCHEME.replace_all(input, |caps: &regex::Captures| {
        format!("{}: {} ***REDACTED***", &caps[1], &caps[2])
    });
    let step2 = RE_KV_SECRET.replace_all(&step1, |caps: &regex::Captures| {
        let value = &caps[4];
        if value.eq_ignore_ascii_case("basic") || value.eq_ignore_ascii_case("bearer") {
            return caps[0].to_string();
        }
        format!("{}{}: {}***REDACTED***{}", &caps[1], &caps[2], &caps[3], &caps[5])
    });
    let step3 = RE_URL_USERINFO.replace_all(&step2, |caps: &regex::Captures| {
        format!("{}REDACTED@", &caps[1])
    });
    step3.into_owned()
}
