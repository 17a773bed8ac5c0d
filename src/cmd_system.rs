//! Manager-wide subcommand handlers: limits, environment, umask, manager, rusage.

use launchkit_core::control::{LimitValue, ResourceLimit, UsageTarget};
use launchkit_core::LaunchctlError;
use serde::Serialize;

use crate::cmd_jobs::Ctl;
use crate::output::Printer;

/// Show every limit, show one, or set one.
pub(crate) async fn limit(
    ctl: &Ctl,
    printer: Printer,
    kind: Option<String>,
    soft: Option<String>,
    hard: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(kind) = kind else {
        let limits = ctl.limits().await?;
        return printer.print(&limits, |limits| {
            for (kind, limit) in limits {
                print_limit(kind.as_str(), limit);
            }
        });
    };

    let Some(soft) = soft else {
        let limit = ctl.limit(kind.clone()).await?;
        return printer.print(&limit, |limit| print_limit(&kind, limit));
    };

    let soft: LimitValue = soft.parse()?;
    let hard = hard.map(|h| h.parse::<LimitValue>()).transpose()?;
    ctl.set_limit(kind.clone(), Some(soft), hard).await?;
    printer.done(&format!("Set {} limit", kind))
}

fn print_limit(kind: &str, limit: &ResourceLimit) {
    println!("\t{:<12}{:<15}{}", kind, limit.soft.to_string(), limit.hard);
}

/// Show the whole environment, or one variable.
pub(crate) async fn getenv(
    ctl: &Ctl,
    printer: Printer,
    key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        None => {
            let env = ctl.env().await?;
            printer.print(&env, |env| {
                for (key, value) in env {
                    println!("{}={}", key, value);
                }
            })
        }
        Some(key) => {
            let value = ctl.env_var(key).await?;
            printer.print(&value, |value| {
                if let Some(value) = value {
                    println!("{}", value);
                }
            })
        }
    }
}

pub(crate) async fn setenv(
    ctl: &Ctl,
    printer: Printer,
    key: String,
    value: String,
) -> Result<(), Box<dyn std::error::Error>> {
    ctl.set_env_var(key.clone(), value).await?;
    printer.done(&format!("Set {}", key))
}

pub(crate) async fn unsetenv(
    ctl: &Ctl,
    printer: Printer,
    key: String,
) -> Result<(), Box<dyn std::error::Error>> {
    ctl.unset_env_var(key.clone()).await?;
    printer.done(&format!("Unset {}", key))
}

/// Parse an octal mask such as `022`.
pub(crate) fn parse_octal(mask: &str) -> Result<u32, LaunchctlError> {
    u32::from_str_radix(mask.trim(), 8)
        .map_err(|_| LaunchctlError::InvalidArgument(format!("invalid octal umask: {}", mask)))
}

/// Show or set the umask.
pub(crate) async fn umask(
    ctl: &Ctl,
    printer: Printer,
    mask: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mask = mask.as_deref().map(parse_octal).transpose()?;
    let current = ctl.umask(mask).await?;
    printer.print(&current, |current| println!("{:04o}", current))
}

#[derive(Serialize)]
struct ManagerInfo {
    name: String,
    uid: u32,
    pid: i32,
}

/// Show the current manager's name, uid and pid.
pub(crate) async fn manager(ctl: &Ctl, printer: Printer) -> Result<(), Box<dyn std::error::Error>> {
    let (name, uid, pid) =
        tokio::try_join!(ctl.manager_name(), ctl.manager_uid(), ctl.manager_pid())?;
    let info = ManagerInfo { name, uid, pid };
    printer.print(&info, |info| {
        println!("Name: {}", info.name);
        println!("UID:  {}", info.uid);
        println!("PID:  {}", info.pid);
    })
}

/// Show resource usage for this process or its children.
pub(crate) async fn rusage(
    ctl: &Ctl,
    printer: Printer,
    who: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let target: UsageTarget = who.parse()?;
    let usage = ctl.resource_usage(target).await?;
    printer.print(&usage, |u| {
        println!("user time:                {:.6}s", u.user_time_used);
        println!("system time:              {:.6}s", u.system_time_used);
        println!("max resident set size:    {}", u.max_resident_set_size);
        println!("shared text memory size:  {}", u.shared_text_memory_size);
        println!("unshared data size:       {}", u.unshared_data_size);
        println!("unshared stack size:      {}", u.unshared_stack_size);
        println!("page reclaims:            {}", u.page_reclaims);
        println!("page faults:              {}", u.page_faults);
        println!("swaps:                    {}", u.swaps);
        println!("block input operations:   {}", u.block_input_operations);
        println!("block output operations:  {}", u.block_output_operations);
        println!("messages sent:            {}", u.messages_sent);
        println!("messages received:        {}", u.messages_received);
        println!("signals received:         {}", u.signals_received);
        println!("voluntary ctx switches:   {}", u.voluntary_context_switches);
        println!("involuntary ctx switches: {}", u.involuntary_context_switches);
    })
}
