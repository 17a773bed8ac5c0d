//! `plist` subcommand: build a job descriptor from flags.

use serde_json::{Map, Value as Json};
use tracing::info;

use launchkit_core::plist::JobDescriptor;
use launchkit_core::{LaunchctlError, Result};

use crate::cli::PlistArgs;

/// Parse `Hour=3,Weekday=sunday` into a calendar interval object.
///
/// Numeric values become numbers; anything else stays a string so weekday
/// names reach the descriptor unchanged.
pub(crate) fn parse_calendar(entry: &str) -> Result<Json> {
    let mut object = Map::new();
    for pair in entry.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            LaunchctlError::InvalidArgument(format!("calendar entry must be KEY=VALUE: {}", pair))
        })?;
        let value = match value.trim().parse::<i64>() {
            Ok(n) => Json::from(n),
            Err(_) => Json::from(value.trim()),
        };
        object.insert(key.trim().to_string(), value);
    }
    Ok(Json::Object(object))
}

/// Parse repeated `KEY=VALUE` flags into an environment object.
pub(crate) fn parse_env(pairs: &[String]) -> Result<Json> {
    let mut object = Map::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            LaunchctlError::InvalidArgument(format!("environment entry must be KEY=VALUE: {}", pair))
        })?;
        object.insert(key.to_string(), Json::from(value));
    }
    Ok(Json::Object(object))
}

/// Build the descriptor described by `args`.
pub(crate) fn build(args: &PlistArgs) -> Result<JobDescriptor> {
    let mut job = JobDescriptor::new();
    job.set_label(args.label.as_str())?;

    if let Some(program) = &args.program {
        job.set_program(program.as_str())?;
    }
    if !args.args.is_empty() {
        job.set_program_args(args.args.clone());
    }
    if args.run_at_load {
        job.set_run_at_load(true)?;
    }
    if args.keep_alive {
        job.set_keep_alive(true)?;
    }
    if let Some(interval) = args.start_interval {
        job.set_start_interval(interval)?;
    }
    if !args.env.is_empty() {
        job.set_environment_variables(parse_env(&args.env)?)?;
    }
    if let Some(dir) = &args.working_directory {
        job.set_working_directory(dir.as_str())?;
    }
    if let Some(path) = &args.stdout_path {
        job.set_stdout_path(path.as_str())?;
    }
    if let Some(path) = &args.stderr_path {
        job.set_stderr_path(path.as_str())?;
    }
    for entry in &args.calendar {
        job.add_calendar_interval(parse_calendar(entry)?)?;
    }
    Ok(job)
}

/// Build the descriptor and print or write it.
pub(crate) fn handle_plist(args: PlistArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let xml = build(&args)?.serialize();
    match &args.output {
        Some(path) => {
            std::fs::write(path, &xml)?;
            info!("Wrote job descriptor: {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchkit_core::plist::Value;

    fn args(label: &str) -> PlistArgs {
        PlistArgs {
            label: label.to_string(),
            program: None,
            args: Vec::new(),
            run_at_load: false,
            keep_alive: false,
            calendar: Vec::new(),
            start_interval: None,
            env: Vec::new(),
            working_directory: None,
            stdout_path: None,
            stderr_path: None,
            output: None,
        }
    }

    #[test]
    fn test_parse_calendar() {
        let json = parse_calendar("Hour=3, Weekday=sunday").unwrap();
        assert_eq!(json, serde_json::json!({"Hour": 3, "Weekday": "sunday"}));
    }

    #[test]
    fn test_parse_calendar_bad_pair() {
        assert!(parse_calendar("Hour").is_err());
    }

    #[test]
    fn test_parse_env() {
        let json = parse_env(&["A=1".to_string(), "B=x=y".to_string()]).unwrap();
        assert_eq!(json, serde_json::json!({"A": "1", "B": "x=y"}));
    }

    #[test]
    fn test_build_full_descriptor() {
        let mut a = args("com.test.cli");
        a.program = Some("/bin/echo".to_string());
        a.args = vec!["hello".to_string()];
        a.run_at_load = true;
        a.calendar = vec!["Hour=3,Weekday=sunday".to_string(), "Minute=30".to_string()];

        let job = build(&a).unwrap();
        assert_eq!(job.get("Label"), Some(&Value::from("com.test.cli")));
        assert_eq!(job.get("RunAtLoad"), Some(&Value::Boolean(true)));
        assert_eq!(job.calendar_intervals().len(), 2);
        assert_eq!(job.calendar_intervals()[0].weekday, Some(0));
    }

    #[test]
    fn test_build_rejects_bad_weekday() {
        let mut a = args("com.test.cli");
        a.calendar = vec!["Weekday=someday".to_string()];
        assert!(matches!(build(&a), Err(LaunchctlError::InvalidWeekday(_))));
    }

    #[test]
    fn test_handle_plist_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("com.test.cli.plist");
        let mut a = args("com.test.cli");
        a.output = Some(path.clone());

        handle_plist(a).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml"));
        assert!(written.contains("<string>com.test.cli</string>"));
    }
}
