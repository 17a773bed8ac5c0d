//! Blocking job-control facade.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::capability::{JobControl, RawResult};
use super::types::{
    JobAction, JobFilter, JobListing, LimitKind, LimitValue, Limits, LoadOptions, RawFailure,
    ResourceLimit, ResourceUsage, SubmitRequest, UsageTarget,
};
use crate::errno::classify;
use crate::error::{LaunchctlError, Result};

/// errno launchd reports when a label is unknown.
const ESRCH: i32 = 3;

/// Job-control operations over a [`JobControl`] capability.
///
/// Every failure the capability reports goes through [`classify`] before it
/// reaches the caller. Argument problems are rejected before the capability
/// is called.
#[derive(Debug)]
pub struct Launchctl<C> {
    control: C,
}

impl<C: JobControl> Launchctl<C> {
    pub fn new(control: C) -> Self {
        Self { control }
    }

    /// The underlying capability.
    pub fn control(&self) -> &C {
        &self.control
    }

    /// List jobs.
    ///
    /// [`JobFilter::ByLabel`] yields [`JobListing::One`] or
    /// [`LaunchctlError::NotFound`]; the other filters yield
    /// [`JobListing::Many`]. Jobs without a label never match a pattern.
    pub fn list(&self, filter: &JobFilter) -> Result<JobListing> {
        match filter {
            JobFilter::All => {
                let jobs = settle("list", self.control.all_jobs())?;
                Ok(JobListing::Many(jobs))
            }
            JobFilter::ByLabel(label) => {
                require_label(label)?;
                match self.control.job(label) {
                    Ok(Some(job)) => Ok(JobListing::One(job)),
                    Ok(None) => Err(LaunchctlError::NotFound(label.clone())),
                    Err(failure) if failure.code == ESRCH => {
                        Err(LaunchctlError::NotFound(label.clone()))
                    }
                    Err(failure) => settle("list", Err(failure)),
                }
            }
            JobFilter::ByPattern(pattern) => {
                let jobs = settle("list", self.control.all_jobs())?;
                Ok(JobListing::Many(
                    jobs.into_iter()
                        .filter(|job| job.label.as_deref().is_some_and(|l| pattern.is_match(l)))
                        .collect(),
                ))
            }
        }
    }

    pub fn start(&self, label: &str) -> Result<()> {
        self.start_stop_remove(label, JobAction::Start)
    }

    pub fn stop(&self, label: &str) -> Result<()> {
        self.start_stop_remove(label, JobAction::Stop)
    }

    pub fn remove(&self, label: &str) -> Result<()> {
        self.start_stop_remove(label, JobAction::Remove)
    }

    /// Stop then start. A failed stop is returned and start is not attempted.
    pub fn restart(&self, label: &str) -> Result<()> {
        self.stop(label)?;
        self.start(label)
    }

    fn start_stop_remove(&self, label: &str, action: JobAction) -> Result<()> {
        require_label(label)?;
        debug!(label, %action, "delegating job action");
        settle_unit(action.as_str(), self.control.start_stop_remove(label, action))?;
        info!(label, %action, "job action completed");
        Ok(())
    }

    /// Load the job definition(s) at `path`.
    pub fn load(&self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<()> {
        let path = path.as_ref();
        validate_load(path, options)?;
        debug!(path = %path.display(), ?options, "loading job");
        settle_unit("load", self.control.load(path, options))?;
        info!(path = %path.display(), "job loaded");
        Ok(())
    }

    /// Unload the job definition(s) at `path`.
    pub fn unload(&self, path: impl AsRef<Path>, options: &LoadOptions) -> Result<()> {
        let path = path.as_ref();
        validate_load(path, options)?;
        debug!(path = %path.display(), ?options, "unloading job");
        settle_unit("unload", self.control.unload(path, options))?;
        info!(path = %path.display(), "job unloaded");
        Ok(())
    }

    /// Submit a job without writing a plist.
    pub fn submit(&self, request: &SubmitRequest) -> Result<()> {
        if request.label.is_empty() {
            return Err(LaunchctlError::InvalidArgument("submit requires a label".to_string()));
        }
        if request.program.is_empty() {
            return Err(LaunchctlError::InvalidArgument("submit requires a program".to_string()));
        }
        settle_unit("submit", self.control.submit(request))?;
        info!(label = %request.label, "job submitted");
        Ok(())
    }

    pub fn manager_name(&self) -> Result<String> {
        settle("managername", self.control.manager_name())
    }

    pub fn manager_uid(&self) -> Result<u32> {
        settle("manageruid", self.control.manager_uid())
    }

    pub fn manager_pid(&self) -> Result<i32> {
        settle("managerpid", self.control.manager_pid())
    }

    /// Every resource limit.
    pub fn limits(&self) -> Result<Limits> {
        settle("limit", self.control.limits())
    }

    /// One resource limit. `kind` is matched case-insensitively.
    pub fn limit(&self, kind: &str) -> Result<ResourceLimit> {
        let kind: LimitKind = kind.parse()?;
        self.limits()?
            .remove(&kind)
            .ok_or_else(|| LaunchctlError::InvalidArgument(format!("unknown limit type: {}", kind)))
    }

    /// Set a resource limit. When only one bound is given it is used for both.
    ///
    /// `maxfiles` cannot be raised to `unlimited`; launchd rejects it.
    pub fn set_limit(
        &self,
        kind: &str,
        soft: Option<LimitValue>,
        hard: Option<LimitValue>,
    ) -> Result<()> {
        let kind: LimitKind = kind.parse()?;
        let (soft, hard) = match (soft, hard) {
            (Some(soft), Some(hard)) => (soft, hard),
            (Some(bound), None) | (None, Some(bound)) => (bound, bound),
            (None, None) => {
                return Err(LaunchctlError::InvalidArgument(
                    "setting a limit requires a soft or hard value".to_string(),
                ));
            }
        };
        if kind == LimitKind::Maxfiles
            && (soft == LimitValue::Unlimited || hard == LimitValue::Unlimited)
        {
            return Err(LaunchctlError::InvalidArgument(
                "the limit for `maxfiles` cannot be set to `unlimited`".to_string(),
            ));
        }
        settle_unit("limit", self.control.set_limit(kind, soft, hard))?;
        info!(%kind, %soft, %hard, "resource limit set");
        Ok(())
    }

    /// The manager's environment.
    pub fn env(&self) -> Result<BTreeMap<String, String>> {
        settle("getenv", self.control.environment())
    }

    /// One environment variable, or `None` when it is not set.
    pub fn env_var(&self, key: &str) -> Result<Option<String>> {
        Ok(self.env()?.remove(key))
    }

    pub fn set_env_var(&self, key: &str, value: &str) -> Result<()> {
        require_env_key(key)?;
        settle_unit("setenv", self.control.set_env(key, value))
    }

    pub fn unset_env_var(&self, key: &str) -> Result<()> {
        require_env_key(key)?;
        settle_unit("unsetenv", self.control.unset_env(key))
    }

    pub fn resource_usage(&self, who: UsageTarget) -> Result<ResourceUsage> {
        settle("getrusage", self.control.resource_usage(who))
    }

    /// Read the umask, or set it when `value` is given.
    pub fn umask(&self, value: Option<u32>) -> Result<u32> {
        if let Some(mask) = value {
            if mask > 0o777 {
                return Err(LaunchctlError::InvalidArgument(format!(
                    "umask must be between 0 and 0777, got {:o}",
                    mask
                )));
            }
        }
        settle("umask", self.control.umask(value))
    }
}

fn require_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(LaunchctlError::InvalidArgument("job label must not be empty".to_string()));
    }
    Ok(())
}

fn require_env_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') {
        return Err(LaunchctlError::InvalidArgument(format!(
            "invalid environment variable name: {:?}",
            key
        )));
    }
    Ok(())
}

fn validate_load(path: &Path, options: &LoadOptions) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(LaunchctlError::InvalidArgument("job path must not be empty".to_string()));
    }
    if options.domain.as_deref().is_some_and(str::is_empty) {
        return Err(LaunchctlError::InvalidArgument("domain must not be empty".to_string()));
    }
    Ok(())
}

/// The classified error for `failure`, or `None` when its errno classifies
/// to nothing.
fn classify_failure(failure: &RawFailure) -> Option<LaunchctlError> {
    let classified = classify(failure.code);
    classified
        .is_error()
        .then_some(LaunchctlError::SystemFailure(classified))
}

/// Settle an operation that returns a payload. An unclassifiable failure
/// leaves nothing to return and is reported as an unexpected response.
fn settle<T>(op: &str, result: RawResult<T>) -> Result<T> {
    result.map_err(|failure| {
        debug!(op, %failure, "capability reported failure");
        classify_failure(&failure).unwrap_or(LaunchctlError::SystemFailure(classify(-1)))
    })
}

/// Settle an operation without a payload. An unclassifiable failure is not
/// an error.
fn settle_unit(op: &str, result: RawResult<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(failure) => match classify_failure(&failure) {
            Some(err) => {
                debug!(op, %failure, "capability reported failure");
                Err(err)
            }
            None => {
                warn!(op, %failure, "ignoring unclassified failure");
                Ok(())
            }
        },
    }
}
