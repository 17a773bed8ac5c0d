//! Request and response types for job control.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LaunchctlError;

/// A job as reported by the service manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobInfo {
    /// Job label. Some entries reported by launchd carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// PID when the job is running.
    #[serde(rename = "PID", skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    /// Wait status of the last exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_exit_status: Option<i64>,
}

impl JobInfo {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_pid(mut self, pid: i64) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_last_exit_status(mut self, status: i64) -> Self {
        self.last_exit_status = Some(status);
        self
    }
}

/// Which jobs `list` returns.
#[derive(Debug, Clone, Default)]
pub enum JobFilter {
    /// Every job.
    #[default]
    All,
    /// The job with exactly this label.
    ByLabel(String),
    /// Jobs whose label matches the pattern.
    ByPattern(Regex),
}

/// Result of `list`: a single job for [`JobFilter::ByLabel`], otherwise many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum JobListing {
    One(JobInfo),
    Many(Vec<JobInfo>),
}

impl JobListing {
    pub fn into_jobs(self) -> Vec<JobInfo> {
        match self {
            JobListing::One(job) => vec![job],
            JobListing::Many(jobs) => jobs,
        }
    }
}

/// Discriminant for the shared start/stop/remove primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum JobAction {
    Start = 1,
    Stop = 2,
    Remove = 3,
}

impl JobAction {
    /// The launchctl subcommand for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobAction::Start => "start",
            JobAction::Stop => "stop",
            JobAction::Remove => "remove",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// launchd session types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionType {
    Aqua,
    LoginWindow,
    Background,
    StandardIO,
    System,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Aqua => "Aqua",
            SessionType::LoginWindow => "LoginWindow",
            SessionType::Background => "Background",
            SessionType::StandardIO => "StandardIO",
            SessionType::System => "System",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = LaunchctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Aqua" => Ok(SessionType::Aqua),
            "LoginWindow" => Ok(SessionType::LoginWindow),
            "Background" => Ok(SessionType::Background),
            "StandardIO" => Ok(SessionType::StandardIO),
            "System" => Ok(SessionType::System),
            _ => Err(LaunchctlError::ConstraintViolation {
                field: "sessionType".to_string(),
                allowed: crate::plist::SESSION_TYPES.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

/// Options for `load` and `unload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Persist the enabled/disabled state (`launchctl load -w`).
    #[serde(default)]
    pub edit_on_disk: bool,
    /// Ignore the Disabled key (`-F`).
    #[serde(default)]
    pub force_load: bool,
    /// Restrict to a session type (`-S`).
    #[serde(default)]
    pub session_type: Option<SessionType>,
    /// Search domain (`-D`), e.g. `user` or `system`.
    #[serde(default)]
    pub domain: Option<String>,
}

impl LoadOptions {
    pub fn edit_on_disk(mut self, yes: bool) -> Self {
        self.edit_on_disk = yes;
        self
    }

    pub fn force_load(mut self, yes: bool) -> Self {
        self.force_load = yes;
        self
    }

    pub fn session_type(mut self, session: SessionType) -> Self {
        self.session_type = Some(session);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// A minimal job handed straight to the manager without a plist on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub label: String,
    pub program: String,
    #[serde(default)]
    pub stdout_path: Option<PathBuf>,
    #[serde(default)]
    pub stderr_path: Option<PathBuf>,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Resource limit categories understood by `launchctl limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    Cpu,
    Filesize,
    Data,
    Stack,
    Core,
    Rss,
    Memlock,
    Maxproc,
    Maxfiles,
}

impl LimitKind {
    pub const ALL: [LimitKind; 9] = [
        LimitKind::Cpu,
        LimitKind::Filesize,
        LimitKind::Data,
        LimitKind::Stack,
        LimitKind::Core,
        LimitKind::Rss,
        LimitKind::Memlock,
        LimitKind::Maxproc,
        LimitKind::Maxfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::Cpu => "cpu",
            LimitKind::Filesize => "filesize",
            LimitKind::Data => "data",
            LimitKind::Stack => "stack",
            LimitKind::Core => "core",
            LimitKind::Rss => "rss",
            LimitKind::Memlock => "memlock",
            LimitKind::Maxproc => "maxproc",
            LimitKind::Maxfiles => "maxfiles",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitKind {
    type Err = LaunchctlError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        LimitKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| LaunchctlError::InvalidArgument(format!("unknown limit type: {}", s)))
    }
}

/// One bound of a resource limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitValue {
    Unlimited,
    #[serde(untagged)]
    Value(u64),
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Unlimited => f.write_str("unlimited"),
            LimitValue::Value(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for LimitValue {
    type Err = LaunchctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(LimitValue::Unlimited);
        }
        trimmed
            .parse()
            .map(LimitValue::Value)
            .map_err(|_| LaunchctlError::InvalidArgument(format!("invalid limit value: {}", s)))
    }
}

impl From<u64> for LimitValue {
    fn from(v: u64) -> Self {
        LimitValue::Value(v)
    }
}

/// Soft and hard bounds for one limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimit {
    pub soft: LimitValue,
    pub hard: LimitValue,
}

/// Every limit, keyed by kind.
pub type Limits = BTreeMap<LimitKind, ResourceLimit>;

/// Whose usage `resource_usage` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageTarget {
    #[serde(rename = "self")]
    SelfProcess,
    Children,
}

impl FromStr for UsageTarget {
    type Err = LaunchctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(UsageTarget::SelfProcess),
            "children" => Ok(UsageTarget::Children),
            _ => Err(LaunchctlError::InvalidArgument(format!(
                "resource usage target must be self or children, got {}",
                s
            ))),
        }
    }
}

/// `getrusage(2)` counters. Times are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub user_time_used: f64,
    pub system_time_used: f64,
    pub max_resident_set_size: i64,
    pub shared_text_memory_size: i64,
    pub unshared_data_size: i64,
    pub unshared_stack_size: i64,
    pub page_reclaims: i64,
    pub page_faults: i64,
    pub swaps: i64,
    pub block_input_operations: i64,
    pub block_output_operations: i64,
    pub messages_sent: i64,
    pub messages_received: i64,
    pub signals_received: i64,
    pub voluntary_context_switches: i64,
    pub involuntary_context_switches: i64,
}

/// A failure reported by a [`JobControl`](super::JobControl) implementation,
/// before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    /// Raw errno (or `-1` when none is known).
    pub code: i32,
    /// Free-form detail for logs.
    pub detail: String,
}

impl RawFailure {
    pub fn new(code: i32, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errno {}: {}", self.code, self.detail)
    }
}

impl std::error::Error for RawFailure {}
