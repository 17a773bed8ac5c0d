//! The job-control capability the facade drives.

use std::collections::BTreeMap;
use std::path::Path;

use super::types::{
    JobAction, JobInfo, LimitKind, LimitValue, Limits, LoadOptions, RawFailure, ResourceUsage,
    SubmitRequest, UsageTarget,
};

/// Result type for capability primitives.
pub type RawResult<T> = std::result::Result<T, RawFailure>;

/// Primitive job-control operations against the service manager.
///
/// Implementations report failures as raw errno values; the
/// [`Launchctl`](super::Launchctl) facade classifies them. Calls block.
pub trait JobControl: Send + Sync {
    /// Every job known to the current manager.
    fn all_jobs(&self) -> RawResult<Vec<JobInfo>>;

    /// The job with exactly `label`, or `None`.
    fn job(&self, label: &str) -> RawResult<Option<JobInfo>>;

    /// Start, stop or remove the job with `label`.
    fn start_stop_remove(&self, label: &str, action: JobAction) -> RawResult<()>;

    /// Load the job definition(s) at `path`.
    fn load(&self, path: &Path, options: &LoadOptions) -> RawResult<()>;

    /// Unload the job definition(s) at `path`.
    fn unload(&self, path: &Path, options: &LoadOptions) -> RawResult<()>;

    /// Submit a job without a plist on disk.
    fn submit(&self, request: &SubmitRequest) -> RawResult<()>;

    /// Name of the current manager (e.g. `Aqua`).
    fn manager_name(&self) -> RawResult<String>;

    fn manager_uid(&self) -> RawResult<u32>;

    fn manager_pid(&self) -> RawResult<i32>;

    /// Every resource limit.
    fn limits(&self) -> RawResult<Limits>;

    fn set_limit(&self, kind: LimitKind, soft: LimitValue, hard: LimitValue) -> RawResult<()>;

    /// The manager's exported environment.
    fn environment(&self) -> RawResult<BTreeMap<String, String>>;

    fn set_env(&self, key: &str, value: &str) -> RawResult<()>;

    fn unset_env(&self, key: &str) -> RawResult<()>;

    /// Read the umask, or set it when `value` is given. Returns the umask in
    /// effect afterwards.
    fn umask(&self, value: Option<u32>) -> RawResult<u32>;

    fn resource_usage(&self, who: UsageTarget) -> RawResult<ResourceUsage>;
}
