//! Outgoing header assembly and bearer token extraction.
use std::collections::{HashMap, HashSet};

use crate::error::RequestError;

pub const AUTHORIZATION: &str = "Authorization";
pub const REQUEST_ID: &str = "X-Request-Id";

/// `format` with its `{}` placeholder replaced by `token`.
pub fn format_auth_header(format: &str, token: &str) -> String {
    format.replacen("{}", token, 1)
}

/// Inverse of `format_auth_header`: strip the text around `{}` from `header`.
pub fn extract_token_from_header(header: &str, format: &str) -> String {
    let (prefix, suffix) = format.split_once("{}").unwrap_or((format, ""));
    let mut token = header.trim();
    token = token.strip_prefix(prefix.trim()).unwrap_or(token).trim_start();
    let suffix = suffix.trim();
    if !suffix.is_empty() {
        token = token.strip_suffix(suffix).unwrap_or(token).trim_end();
    }
    token.to_string()
}

/// Defaults, then per-call additions, then the synthesized auth header.
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    add_headers: &HashMap<String, String>,
    authorization: Option<String>,
) -> HashMap<String, String> {
    let mut headers = defaults.clone();
    headers.extend(add_headers.iter().map(|(k, v)| (k.clone(), v.clone())));
    if let Some(value) = authorization {
        headers.insert(AUTHORIZATION.to_string(), value);
    }
    headers
}

/// Header values must be pairwise distinct across names.
pub fn ensure_unique_values(headers: &HashMap<String, String>) -> Result<(), RequestError> {
    let mut seen = HashSet::with_capacity(headers.len());
    if headers.values().all(|v| seen.insert(v.as_str())) {
        return Ok(());
    }

    let mut by_value: HashMap<&str, Vec<&str>> = HashMap::new();
    for (name, value) in headers {
        by_value.entry(value.as_str()).or_default().push(name.as_str());
    }
    let mut clashing: Vec<&str> = by_value
        .into_values()
        .filter(|names| names.len() > 1)
        .flatten()
        .collect();
    clashing.sort_unstable();
    Err(RequestError::DuplicateHeaders(clashing.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_token_from_header("Bearer abc.def", "Bearer {}"), "abc.def");
        assert_eq!(extract_token_from_header("Token <x>", "Token <{}>"), "x");
        assert_eq!(extract_token_from_header("raw", "{}"), "raw");
    }

    #[test]
    fn auth_header_round_trip() {
        let header = format_auth_header("Bearer {}", "tok");
        assert_eq!(header, "Bearer tok");
        assert_eq!(extract_token_from_header(&header, "Bearer {}"), "tok");
    }

    #[test]
    fn merge_applies_additions_over_defaults() {
        let merged = merge_headers(
            &map(&[("X-Env", "dev"), ("X-Team", "a")]),
            &map(&[("X-Team", "b")]),
            Some("Bearer t".to_string()),
        );
        assert_eq!(merged["X-Env"], "dev");
        assert_eq!(merged["X-Team"], "b");
        assert_eq!(merged[AUTHORIZATION], "Bearer t");
    }

    #[test]
    fn duplicate_values_are_rejected_with_names() {
        let merged = merge_headers(
            &map(&[("X-Default", "v")]),
            &map(&[("X-A", "v"), ("X-B", "v"), ("X-C", "w")]),
            None,
        );
        let err = ensure_unique_values(&merged).unwrap_err();
        match err {
            RequestError::DuplicateHeaders(names) => assert_eq!(names, "X-A, X-B, X-Default"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unique_values_pass() {
        assert!(ensure_unique_values(&map(&[("X-A", "1"), ("X-B", "2")])).is_ok());
    }
}
