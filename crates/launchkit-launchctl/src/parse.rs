//! Parsers for `launchctl` output.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use launchkit_core::control::{JobInfo, LimitKind, LimitValue, Limits, ResourceLimit};

/// `Load failed: 5: Input/output error`, `Boot-out failed: 3: ...` and friends.
static ERRNO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfailed:\s*(\d+):\s+\S").expect("valid regex"));

/// `PATH="/usr/bin:/bin"; export PATH;`
static EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)="((?:[^"\\]|\\.)*)";\s*export\s+\w+;\s*$"#)
        .expect("valid regex")
});

/// Parse the `PID  Status  Label` table printed by `launchctl list`.
///
/// `-` in the PID or status column means the value is absent. Rows that do
/// not have three columns are skipped.
pub fn parse_job_table(output: &str) -> Vec<JobInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with("PID"))
        .filter_map(parse_job_row)
        .collect()
}

fn parse_job_row(line: &str) -> Option<JobInfo> {
    let mut columns = line.splitn(3, '\t');
    let pid = columns.next()?.trim();
    let status = columns.next()?.trim();
    let label = columns.next()?.trim();

    Some(JobInfo {
        label: (!label.is_empty()).then(|| label.to_string()),
        pid: pid.parse().ok(),
        last_exit_status: status.parse().ok(),
    })
}

/// Parse `launchctl limit` output: one `kind soft hard` row per limit.
///
/// Rows naming an unknown kind are skipped.
pub fn parse_limits(output: &str) -> Limits {
    let mut limits = Limits::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [kind, soft, hard] = fields.as_slice() else {
            continue;
        };
        let (Ok(kind), Ok(soft), Ok(hard)) = (
            kind.parse::<LimitKind>(),
            soft.parse::<LimitValue>(),
            hard.parse::<LimitValue>(),
        ) else {
            continue;
        };
        limits.insert(kind, ResourceLimit { soft, hard });
    }
    limits
}

/// Parse `launchctl export` output into a map.
pub fn parse_environment(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| EXPORT_RE.captures(line))
        .map(|caps| (caps[1].to_string(), unescape_shell(&caps[2])))
        .collect()
}

fn unescape_shell(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The errno embedded in a launchctl diagnostic, if any.
pub fn parse_failure_code(stderr: &str) -> Option<i32> {
    ERRNO_RE
        .captures(stderr)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parse an octal umask such as `0022`.
pub(crate) fn parse_umask(output: &str) -> Option<u32> {
    u32::from_str_radix(output.trim(), 8).ok()
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
