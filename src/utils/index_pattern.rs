//! Index name expressions
//!
//! Names passed to a metadata request are one of:
//! - a concrete index or alias name: `employees`
//! - a wildcard pattern, `*` matching any run of characters: `logs-*`
//! - `_all`, meaning every index
//! - an exclusion, `-pattern`, removing earlier matches: `logs-*,-logs-old`
//! - a remote name, `cluster:index`, addressing another cluster
//!
//! ## Examples
//! - `"logs-*"` matches `"logs-2024"` and `"logs-"`, not `"old-logs-1"`
//! - `"*"` and `"_all"` match everything

use regex::Regex;

pub const ALL: &str = "_all";

pub fn is_wildcard(expression: &str) -> bool {
    expression.contains('*')
}

pub fn is_match_all(expression: &str) -> bool {
    expression == ALL || expression == "*"
}

/// `cluster:index` addresses a remote cluster
pub fn is_remote(expression: &str) -> bool {
    expression.contains(':')
}

/// Compile a `*` wildcard pattern into an anchored regex
///
/// Everything other than `*` is matched literally, so `.` in
/// `.security-*` is a dot and not "any character".
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body))
}
