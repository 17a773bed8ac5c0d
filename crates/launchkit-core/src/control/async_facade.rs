//! Async and callback call shapes over [`Launchctl`].
//!
//! Both shapes run the blocking facade on tokio's blocking pool, so neither
//! duplicates any of its logic.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::warn;

use super::capability::JobControl;
use super::facade::Launchctl;
use super::types::{
    JobFilter, JobListing, LimitValue, Limits, LoadOptions, ResourceLimit, ResourceUsage,
    SubmitRequest, UsageTarget,
};
use crate::errno::classify;
use crate::error::{LaunchctlError, Result};

/// Generates an `async fn` and a `*_with(callback)` twin for each operation.
macro_rules! adapters {
    ($(
        $(#[$doc:meta])*
        $name:ident / $with:ident ($($arg:ident: $ty:ty),*) -> $ret:ty => |$ctl:ident| $body:expr;
    )*) => {
        $(
            $(#[$doc])*
            pub async fn $name(&self, $($arg: $ty),*) -> Result<$ret> {
                self.call(move |$ctl| $body).await
            }

            $(#[$doc])*
            ///
            /// The callback runs exactly once, on a blocking-pool thread.
            pub fn $with<F>(&self, $($arg: $ty,)* callback: F) -> JoinHandle<()>
            where
                F: FnOnce(Result<$ret>) + Send + 'static,
            {
                self.call_with(move |$ctl| $body, callback)
            }
        )*
    };
}

/// Shareable async front-end for a [`Launchctl`].
#[derive(Debug)]
pub struct AsyncLaunchctl<C> {
    inner: Arc<Launchctl<C>>,
}

impl<C> Clone for AsyncLaunchctl<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: JobControl + 'static> AsyncLaunchctl<C> {
    pub fn new(control: C) -> Self {
        Self::from_facade(Launchctl::new(control))
    }

    pub fn from_facade(facade: Launchctl<C>) -> Self {
        Self {
            inner: Arc::new(facade),
        }
    }

    /// The blocking facade.
    pub fn blocking(&self) -> &Launchctl<C> {
        &self.inner
    }

    /// Run `op` on the blocking pool and await its result.
    pub async fn call<T, Op>(&self, op: Op) -> Result<T>
    where
        T: Send + 'static,
        Op: FnOnce(&Launchctl<C>) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        match tokio::task::spawn_blocking(move || op(&inner)).await {
            Ok(result) => result,
            Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
            Err(_) => Err(LaunchctlError::SystemFailure(classify(-1))),
        }
    }

    /// Run `op` on the blocking pool and hand its result to `callback`.
    ///
    /// A panicking `op` still reaches `callback`, as an unexpected response.
    pub fn call_with<T, Op, F>(&self, op: Op, callback: F) -> JoinHandle<()>
    where
        T: Send + 'static,
        Op: FnOnce(&Launchctl<C>) -> Result<T> + Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| op(&inner))).unwrap_or_else(|_| {
                warn!("launchctl operation panicked");
                Err(LaunchctlError::SystemFailure(classify(-1)))
            });
            callback(result)
        })
    }

    adapters! {
        /// List jobs matching `filter`.
        list / list_with(filter: JobFilter) -> JobListing => |ctl| ctl.list(&filter);
        /// Start a job.
        start / start_with(label: String) -> () => |ctl| ctl.start(&label);
        /// Stop a job.
        stop / stop_with(label: String) -> () => |ctl| ctl.stop(&label);
        /// Remove a job.
        remove / remove_with(label: String) -> () => |ctl| ctl.remove(&label);
        /// Stop then start a job.
        restart / restart_with(label: String) -> () => |ctl| ctl.restart(&label);
        /// Load a job definition.
        load / load_with(path: PathBuf, options: LoadOptions) -> () => |ctl| ctl.load(&path, &options);
        /// Unload a job definition.
        unload / unload_with(path: PathBuf, options: LoadOptions) -> () => |ctl| ctl.unload(&path, &options);
        /// Submit a job.
        submit / submit_with(request: SubmitRequest) -> () => |ctl| ctl.submit(&request);
        /// Every resource limit.
        limits / limits_with() -> Limits => |ctl| ctl.limits();
        /// One resource limit.
        limit / limit_with(kind: String) -> ResourceLimit => |ctl| ctl.limit(&kind);
        /// Set a resource limit.
        set_limit / set_limit_with(kind: String, soft: Option<LimitValue>, hard: Option<LimitValue>) -> () => |ctl| ctl.set_limit(&kind, soft, hard);
        /// The manager's environment.
        env / env_with() -> BTreeMap<String, String> => |ctl| ctl.env();
        /// One environment variable.
        env_var / env_var_with(key: String) -> Option<String> => |ctl| ctl.env_var(&key);
        /// Set an environment variable.
        set_env_var / set_env_var_with(key: String, value: String) -> () => |ctl| ctl.set_env_var(&key, &value);
        /// Unset an environment variable.
        unset_env_var / unset_env_var_with(key: String) -> () => |ctl| ctl.unset_env_var(&key);
        /// Read or set the umask.
        umask / umask_with(value: Option<u32>) -> u32 => |ctl| ctl.umask(value);
        /// Resource usage for this process or its children.
        resource_usage / resource_usage_with(who: UsageTarget) -> ResourceUsage => |ctl| ctl.resource_usage(who);
        /// Name of the current manager.
        manager_name / manager_name_with() -> String => |ctl| ctl.manager_name();
        /// UID of the current manager.
        manager_uid / manager_uid_with() -> u32 => |ctl| ctl.manager_uid();
        /// PID of the current manager.
        manager_pid / manager_pid_with() -> i32 => |ctl| ctl.manager_pid();
    }
}
