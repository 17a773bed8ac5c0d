//! `launchctl` subprocess backend.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use launchkit_core::control::{
    JobAction, JobControl, JobInfo, LimitKind, LimitValue, Limits, LoadOptions, RawFailure,
    RawResult, ResourceUsage, SubmitRequest, UsageTarget,
};

use crate::parse::{
    parse_environment, parse_failure_code, parse_job_table, parse_limits, parse_umask,
};
use crate::rusage;

/// Where launchctl lives on macOS.
pub const DEFAULT_BINARY: &str = "/bin/launchctl";

/// Runs `launchctl` for every capability primitive.
#[derive(Debug, Clone)]
pub struct LaunchctlCommand {
    binary: PathBuf,
}

impl Default for LaunchctlCommand {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl LaunchctlCommand {
    /// Create a backend that runs the given launchctl binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run launchctl and return its stdout.
    fn run<I, S>(&self, args: I) -> RawResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        tracing::debug!(binary = %self.binary.display(), ?args, "running launchctl");

        let output = Command::new(&self.binary).args(&args).output().map_err(|e| {
            RawFailure::new(
                e.raw_os_error().unwrap_or(-1),
                format!("Failed to execute launchctl: {}", e),
            )
        })?;

        check_output(&output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_unit<I, S>(&self, args: I) -> RawResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.run(args).map(|_| ())
    }

    fn run_number<T: std::str::FromStr>(&self, subcommand: &str) -> RawResult<T> {
        let stdout = self.run([subcommand])?;
        stdout.trim().parse().map_err(|_| {
            RawFailure::new(-1, format!("unexpected {} output: {:?}", subcommand, stdout.trim()))
        })
    }
}

/// Turn a finished launchctl process into a failure, if it failed.
///
/// launchctl sometimes exits 0 after printing `... failed: N: message`, so
/// stderr is checked even on success. The exit status is not an errno; a
/// failed run without one in stderr reports `-1`.
fn check_output(output: &Output) -> RawResult<()> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if let Some(code) = parse_failure_code(&stderr) {
        return Err(RawFailure::new(code, stderr.trim()));
    }
    if output.status.success() {
        return Ok(());
    }
    let detail = match output.status.code() {
        Some(status) => format!("exit status {}: {}", status, stderr.trim()),
        None => format!("terminated by signal: {}", stderr.trim()),
    };
    Err(RawFailure::new(-1, detail))
}

fn load_args(subcommand: &str, path: &Path, options: &LoadOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![subcommand.into()];
    if options.edit_on_disk {
        args.push("-w".into());
    }
    if options.force_load {
        args.push("-F".into());
    }
    if let Some(session) = options.session_type {
        args.push("-S".into());
        args.push(session.as_str().into());
    }
    if let Some(domain) = &options.domain {
        args.push("-D".into());
        args.push(domain.into());
    }
    args.push(path.into());
    args
}

fn submit_args(request: &SubmitRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "submit".into(),
        "-l".into(),
        request.label.as_str().into(),
        "-p".into(),
        request.program.as_str().into(),
    ];
    if let Some(path) = &request.stdout_path {
        args.push("-o".into());
        args.push(path.into());
    }
    if let Some(path) = &request.stderr_path {
        args.push("-e".into());
        args.push(path.into());
    }
    args.push("--".into());
    args.push(request.program.as_str().into());
    args.extend(request.arguments.iter().map(OsString::from));
    args
}

impl JobControl for LaunchctlCommand {
    fn all_jobs(&self) -> RawResult<Vec<JobInfo>> {
        Ok(parse_job_table(&self.run(["list"])?))
    }

    fn job(&self, label: &str) -> RawResult<Option<JobInfo>> {
        Ok(self
            .all_jobs()?
            .into_iter()
            .find(|job| job.label.as_deref() == Some(label)))
    }

    fn start_stop_remove(&self, label: &str, action: JobAction) -> RawResult<()> {
        self.run_unit([action.as_str(), label])
    }

    fn load(&self, path: &Path, options: &LoadOptions) -> RawResult<()> {
        self.run_unit(load_args("load", path, options))
    }

    fn unload(&self, path: &Path, options: &LoadOptions) -> RawResult<()> {
        self.run_unit(load_args("unload", path, options))
    }

    fn submit(&self, request: &SubmitRequest) -> RawResult<()> {
        self.run_unit(submit_args(request))
    }

    fn manager_name(&self) -> RawResult<String> {
        Ok(self.run(["managername"])?.trim().to_string())
    }

    fn manager_uid(&self) -> RawResult<u32> {
        self.run_number("manageruid")
    }

    fn manager_pid(&self) -> RawResult<i32> {
        self.run_number("managerpid")
    }

    fn limits(&self) -> RawResult<Limits> {
        Ok(parse_limits(&self.run(["limit"])?))
    }

    fn set_limit(&self, kind: LimitKind, soft: LimitValue, hard: LimitValue) -> RawResult<()> {
        self.run_unit([
            "limit".to_string(),
            kind.to_string(),
            soft.to_string(),
            hard.to_string(),
        ])
    }

    fn environment(&self) -> RawResult<BTreeMap<String, String>> {
        Ok(parse_environment(&self.run(["export"])?))
    }

    fn set_env(&self, key: &str, value: &str) -> RawResult<()> {
        self.run_unit(["setenv", key, value])
    }

    fn unset_env(&self, key: &str) -> RawResult<()> {
        self.run_unit(["unsetenv", key])
    }

    fn umask(&self, value: Option<u32>) -> RawResult<u32> {
        if let Some(mask) = value {
            self.run_unit(["umask".to_string(), format!("{:03o}", mask)])?;
            return Ok(mask);
        }
        let stdout = self.run(["umask"])?;
        parse_umask(&stdout)
            .ok_or_else(|| RawFailure::new(-1, format!("unexpected umask output: {:?}", stdout.trim())))
    }

    fn resource_usage(&self, who: UsageTarget) -> RawResult<ResourceUsage> {
        rusage::resource_usage(who)
    }
}
