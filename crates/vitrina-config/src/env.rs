//! Helpers for reading typed values out of the process environment.

use std::env;
use std::str::FromStr;

/// Parses `key`, falling back to `default` when unset or unparsable.
pub fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag. `false`, `0`, `no` and `off` disable it.
pub fn flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => !matches!(
            v.trim().to_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        Err(_) => default,
    }
}

pub fn string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma separated variable, dropping empty entries.
pub fn list(key: &str, default: &str) -> Vec<String> {
    string(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
