//! Job subcommand handlers: list, start/stop/remove/restart, load/unload, submit.

use regex::Regex;
use tracing::info;

use launchkit_core::control::{
    AsyncLaunchctl, JobFilter, JobInfo, JobListing, LoadOptions, SessionType, SubmitRequest,
};
use launchkit_core::LaunchctlError;
use launchkit_launchctl::LaunchctlCommand;

use launchkit_config::Config;

use crate::cli::LoadArgs;
use crate::output::{dash, Printer};

pub(crate) type Ctl = AsyncLaunchctl<LaunchctlCommand>;

/// Which of start/stop/remove/restart to run.
#[derive(Debug, Clone, Copy)]
pub(crate) enum JobVerb {
    Start,
    Stop,
    Remove,
    Restart,
}

/// List jobs, optionally by exact label or label pattern.
pub(crate) async fn list(
    ctl: &Ctl,
    printer: Printer,
    label: Option<String>,
    pattern: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match (label, pattern) {
        (Some(label), _) => JobFilter::ByLabel(label),
        (None, Some(pattern)) => JobFilter::ByPattern(Regex::new(&pattern)?),
        (None, None) => JobFilter::All,
    };

    let listing = ctl.list(filter).await?;
    printer.print(&listing, |listing| match listing {
        JobListing::One(job) => print_job_detail(job),
        JobListing::Many(jobs) => print_job_table(jobs),
    })
}

fn print_job_table(jobs: &[JobInfo]) {
    println!("{:<8}{:<8}{}", "PID", "Status", "Label");
    for job in jobs {
        println!(
            "{:<8}{:<8}{}",
            dash(job.pid),
            dash(job.last_exit_status),
            job.label.as_deref().unwrap_or("-")
        );
    }
}

fn print_job_detail(job: &JobInfo) {
    println!("Label:          {}", job.label.as_deref().unwrap_or("-"));
    println!("PID:            {}", dash(job.pid));
    println!("LastExitStatus: {}", dash(job.last_exit_status));
}

/// Start, stop, remove or restart a job.
pub(crate) async fn control(
    ctl: &Ctl,
    printer: Printer,
    verb: JobVerb,
    label: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = match verb {
        JobVerb::Start => {
            ctl.start(label.clone()).await?;
            format!("Started {}", label)
        }
        JobVerb::Stop => {
            ctl.stop(label.clone()).await?;
            format!("Stopped {}", label)
        }
        JobVerb::Remove => {
            ctl.remove(label.clone()).await?;
            format!("Removed {}", label)
        }
        JobVerb::Restart => {
            ctl.restart(label.clone()).await?;
            format!("Restarted {}", label)
        }
    };
    printer.done(&message)
}

/// Build load/unload options from flags, falling back to config defaults.
pub(crate) fn load_options(args: &LoadArgs, config: &Config) -> Result<LoadOptions, LaunchctlError> {
    let session_type = match &args.session_type {
        Some(s) => Some(s.parse::<SessionType>()?),
        None => config.launchctl.default_session_type,
    };
    Ok(LoadOptions {
        edit_on_disk: args.write,
        force_load: args.force,
        session_type,
        domain: args
            .domain
            .clone()
            .or_else(|| config.launchctl.default_domain.clone()),
    })
}

/// Load or unload a job definition.
pub(crate) async fn load(
    ctl: &Ctl,
    printer: Printer,
    config: &Config,
    args: LoadArgs,
    unload: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(&args, config)?;
    let path = args.path;
    let message = if unload {
        ctl.unload(path.clone(), options).await?;
        format!("Unloaded {}", path.display())
    } else {
        ctl.load(path.clone(), options).await?;
        format!("Loaded {}", path.display())
    };
    printer.done(&message)
}

/// Submit a job without a plist.
pub(crate) async fn submit(
    ctl: &Ctl,
    printer: Printer,
    request: SubmitRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let label = request.label.clone();
    ctl.submit(request).await?;
    info!("Submitted job: {}", label);
    printer.done(&format!("Submitted {}", label))
}
