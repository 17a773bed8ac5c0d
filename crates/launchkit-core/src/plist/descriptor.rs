//! Validating builder for launchd job descriptors.

use serde_json::Value as Json;
use tracing::{debug, warn};

use super::calendar::CalendarInterval;
use super::value::{Dictionary, Value};
use super::xml;
use crate::error::{LaunchctlError, Result};
use crate::utils::{integral, to_number};

/// Key under which calendar intervals are serialized.
pub const START_CALENDAR_INTERVAL: &str = "StartCalendarInterval";

/// Allowed values for `LimitLoadToSessionType`.
pub const SESSION_TYPES: &[&str] = &["Aqua", "LoginWindow", "Background", "StandardIO", "System"];

/// Allowed values for `ProcessType`.
pub const PROCESS_TYPES: &[&str] = &["Background", "Standard", "Adaptive", "Interactive"];

macro_rules! boolean_setters {
    ($($(#[$doc:meta])* $method:ident => $key:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, value: impl Into<Json>) -> Result<&mut Self> {
                self.add_boolean($key, value)
            }
        )*
    };
}

macro_rules! number_setters {
    ($($(#[$doc:meta])* $method:ident => $key:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, value: impl Into<Json>) -> Result<&mut Self> {
                self.add_number($key, value)
            }
        )*
    };
}

macro_rules! array_setters {
    ($($(#[$doc:meta])* $method:ident => $key:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&mut self, value: impl Into<Json>) -> &mut Self {
                self.add_array($key, value)
            }
        )*
    };
}

/// A launchd job descriptor under construction.
///
/// Setters validate their input before touching the document, so a rejected
/// call leaves it exactly as it was. Each returns `&mut Self` for chaining:
///
/// ```
/// use launchkit_core::plist::JobDescriptor;
///
/// let mut job = JobDescriptor::new();
/// job.set_label("com.test.job")?
///     .set_program("/bin/echo")?
///     .set_program_args(vec!["hello"])
///     .set_run_at_load(true)?;
/// let xml = job.serialize();
/// assert!(xml.contains("<key>RunAtLoad</key>"));
/// # Ok::<(), launchkit_core::LaunchctlError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDescriptor {
    fields: Dictionary,
    calendar: Vec<CalendarInterval>,
}

impl JobDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a descriptor pre-seeded with `fields`.
    ///
    /// A seeded `StartCalendarInterval` (a single dictionary or an array of
    /// them) goes through the same validation as
    /// [`add_calendar_interval`](Self::add_calendar_interval).
    pub fn from_dictionary(mut fields: Dictionary) -> Result<Self> {
        let seeded = fields.remove(START_CALENDAR_INTERVAL);
        let mut job = Self {
            fields,
            calendar: Vec::new(),
        };
        match seeded {
            None => {}
            Some(Value::Array(items)) => {
                for item in &items {
                    job.add_calendar_interval(item.to_json())?;
                }
            }
            Some(single) => {
                job.add_calendar_interval(single.to_json())?;
            }
        }
        Ok(job)
    }

    /// Parse a descriptor from an XML property list.
    pub fn from_xml(input: &str) -> Result<Self> {
        Self::from_dictionary(xml::parse(input)?)
    }

    /// Look up a stored field. Calendar intervals are not stored here; see
    /// [`calendar_intervals`](Self::calendar_intervals).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The accumulated calendar intervals in insertion order.
    pub fn calendar_intervals(&self) -> &[CalendarInterval] {
        &self.calendar
    }

    /// Whether nothing has been set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.calendar.is_empty()
    }

    // ---------------------------------------------------------------------
    // Generic setters
    // ---------------------------------------------------------------------

    /// Store a strict boolean under `key`.
    pub fn add_boolean(&mut self, key: &str, value: impl Into<Json>) -> Result<&mut Self> {
        reject_calendar_key(key)?;
        match value.into() {
            Json::Bool(b) => Ok(self.insert(key, Value::Boolean(b))),
            _ => Err(LaunchctlError::type_mismatch(key, "a boolean")),
        }
    }

    /// Store a string under `key`. Numbers are stringified first, whole
    /// numbers without a fractional part; when `allowed` is given the value
    /// must be one of its entries.
    pub fn add_string(
        &mut self,
        key: &str,
        value: impl Into<Json>,
        allowed: Option<&[&str]>,
    ) -> Result<&mut Self> {
        reject_calendar_key(key)?;
        let s = match value.into() {
            Json::String(s) => s,
            Json::Number(n) if n.is_f64() => match n.as_f64().and_then(integral) {
                Some(whole) => whole.to_string(),
                None => n.to_string(),
            },
            Json::Number(n) => n.to_string(),
            _ => return Err(LaunchctlError::type_mismatch(key, "a string")),
        };
        if let Some(allowed) = allowed.filter(|a| !a.is_empty()) {
            if !allowed.contains(&s.as_str()) {
                return Err(LaunchctlError::ConstraintViolation {
                    field: key.to_string(),
                    allowed: allowed.iter().map(|a| a.to_string()).collect(),
                });
            }
        }
        Ok(self.insert(key, Value::String(s)))
    }

    /// Store a number under `key`, coercing numeric strings and booleans.
    pub fn add_number(&mut self, key: &str, value: impl Into<Json>) -> Result<&mut Self> {
        reject_calendar_key(key)?;
        let n = to_number(&value.into())
            .ok_or_else(|| LaunchctlError::type_mismatch(key, "a valid number"))?;
        Ok(self.insert(key, Value::from_number(n)))
    }

    /// Store an array under `key`. Never fails.
    ///
    /// A bare value is wrapped into a one-element array; `null`, `false`,
    /// `0` and `""` produce an empty array.
    ///
    /// Under `StartCalendarInterval` the items replace the calendar
    /// intervals; a list holding an invalid interval is logged and ignored.
    pub fn add_array(&mut self, key: &str, value: impl Into<Json>) -> &mut Self {
        let value = value.into();
        if key == START_CALENDAR_INTERVAL {
            if !truthy(&value) {
                self.calendar.clear();
            } else if let Err(err) = self.replace_calendar(&value) {
                warn!(%err, "ignoring invalid calendar intervals");
            }
            return self;
        }
        let items = match &value {
            Json::Array(_) => match Value::from_json(&value) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            v if !truthy(v) => Vec::new(),
            v => Value::from_json(v).into_iter().collect(),
        };
        self.insert(key, Value::Array(items))
    }

    /// Store an object under `key`. Arrays and scalars are rejected.
    ///
    /// Under `StartCalendarInterval` the object replaces the calendar
    /// intervals.
    pub fn add_object(&mut self, key: &str, value: impl Into<Json>) -> Result<&mut Self> {
        let value = value.into();
        if key == START_CALENDAR_INTERVAL {
            if !value.is_object() {
                return Err(LaunchctlError::type_mismatch(key, "an object"));
            }
            return self.replace_calendar(&value);
        }
        match Value::from_json(&value) {
            Some(dict @ Value::Dictionary(_)) => Ok(self.insert(key, dict)),
            _ => Err(LaunchctlError::type_mismatch(key, "an object")),
        }
    }

    /// Validate every interval in `value` (one object or an array of them)
    /// before replacing the accumulated ones.
    fn replace_calendar(&mut self, value: &Json) -> Result<&mut Self> {
        let intervals = match value {
            Json::Array(items) => items
                .iter()
                .map(CalendarInterval::from_json)
                .collect::<Result<Vec<_>>>()?,
            single => vec![CalendarInterval::from_json(single)?],
        };
        self.calendar = intervals;
        Ok(self)
    }

    fn insert(&mut self, key: &str, value: Value) -> &mut Self {
        debug!(key, "setting job descriptor field");
        self.fields.insert(key.to_string(), value);
        self
    }

    // ---------------------------------------------------------------------
    // Booleans
    // ---------------------------------------------------------------------

    boolean_setters! {
        /// Sets `Disabled`.
        set_disabled => "Disabled";
        /// Sets `EnableGlobbing`.
        set_enable_globbing => "EnableGlobbing";
        /// Sets `EnableTransactions`.
        set_enable_transactions => "EnableTransactions";
        /// Sets `OnDemand`.
        set_on_demand => "OnDemand";
        /// Sets `RunAtLoad`: start the job as soon as it is loaded.
        set_run_at_load => "RunAtLoad";
        /// Sets `InitGroups`.
        set_init_groups => "InitGroups";
        /// Sets `StartOnMount`.
        set_start_on_mount => "StartOnMount";
        /// Sets `Debug`, raising the job's log mask to LOG_DEBUG.
        set_debug => "Debug";
        /// Sets `WaitForDebugger`.
        set_wait_for_debugger => "WaitForDebugger";
        /// Sets `AbandonProcessGroup`: keep other processes in the group alive
        /// when the job exits.
        set_abandon_process_group => "AbandonProcessGroup";
        /// Sets `LowPriorityIO`.
        set_low_priority_io => "LowPriorityIO";
        /// Sets `LaunchOnlyOnce`.
        set_launch_only_once => "LaunchOnlyOnce";
    }

    /// Sets `inetdCompatibility` to `{ Wait: wait }`.
    pub fn set_inetd_compatibility_wait(&mut self, wait: impl Into<Json>) -> Result<&mut Self> {
        match wait.into() {
            Json::Bool(b) => {
                let dict = Dictionary::from([("Wait".to_string(), Value::Boolean(b))]);
                Ok(self.insert("inetdCompatibility", Value::Dictionary(dict)))
            }
            _ => Err(LaunchctlError::type_mismatch("inetdCompatibility.Wait", "a boolean")),
        }
    }

    // ---------------------------------------------------------------------
    // Strings
    // ---------------------------------------------------------------------

    /// Sets `Label`, the job's unique identifier.
    pub fn set_label(&mut self, label: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("Label", label, None)
    }

    /// Sets `Program`, the executable to run.
    pub fn set_program(&mut self, program: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("Program", program, None)
    }

    pub fn set_user_name(&mut self, user: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("UserName", user, None)
    }

    pub fn set_group_name(&mut self, group: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("GroupName", group, None)
    }

    /// Sets `LimitLoadToSessionType`; must be one of [`SESSION_TYPES`].
    pub fn set_limit_load_to_session_type(&mut self, session: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("LimitLoadToSessionType", session, Some(SESSION_TYPES))
    }

    pub fn set_stderr_path(&mut self, path: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("StandardErrorPath", path, None)
    }

    pub fn set_stdout_path(&mut self, path: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("StandardOutPath", path, None)
    }

    pub fn set_stdin_path(&mut self, path: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("StandardInPath", path, None)
    }

    /// Sets `RootDirectory`, the chroot for the job.
    pub fn set_root_directory(&mut self, dir: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("RootDirectory", dir, None)
    }

    pub fn set_working_directory(&mut self, dir: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("WorkingDirectory", dir, None)
    }

    /// Sets `ProcessType`; must be one of [`PROCESS_TYPES`].
    pub fn set_process_type(&mut self, kind: impl Into<Json>) -> Result<&mut Self> {
        self.add_string("ProcessType", kind, Some(PROCESS_TYPES))
    }

    // ---------------------------------------------------------------------
    // Numbers
    // ---------------------------------------------------------------------

    number_setters! {
        /// Sets `Umask`.
        set_umask => "Umask";
        /// Sets `TimeOut`, the idle timeout in seconds.
        set_timeout => "TimeOut";
        /// Sets `ExitTimeOut`, seconds between SIGTERM and SIGKILL.
        set_exit_timeout => "ExitTimeOut";
        /// Sets `ThrottleInterval`, the minimum seconds between spawns.
        set_throttle_interval => "ThrottleInterval";
        /// Sets `StartInterval`, run every N seconds.
        set_start_interval => "StartInterval";
        /// Sets `Nice`.
        set_nice => "Nice";
    }

    // ---------------------------------------------------------------------
    // Arrays
    // ---------------------------------------------------------------------

    array_setters! {
        /// Sets `ProgramArguments`.
        set_program_args => "ProgramArguments";
        /// Sets `LimitLoadToHosts`.
        set_limit_load_to_hosts => "LimitLoadToHosts";
        /// Sets `LimitLoadFromHosts`.
        set_limit_load_from_hosts => "LimitLoadFromHosts";
        /// Sets `WatchPaths`.
        set_watch_paths => "WatchPaths";
        /// Sets `QueueDirectories`.
        set_queue_directories => "QueueDirectories";
    }

    // ---------------------------------------------------------------------
    // Objects
    // ---------------------------------------------------------------------

    /// Sets `EnvironmentVariables`.
    pub fn set_environment_variables(&mut self, vars: impl Into<Json>) -> Result<&mut Self> {
        self.add_object("EnvironmentVariables", vars)
    }

    pub fn set_soft_resource_limits(&mut self, _limits: impl Into<Json>) -> Result<&mut Self> {
        Err(LaunchctlError::Unsupported("SoftResourceLimits"))
    }

    pub fn set_hard_resource_limits(&mut self, _limits: impl Into<Json>) -> Result<&mut Self> {
        Err(LaunchctlError::Unsupported("HardResourceLimits"))
    }

    pub fn add_mach_service(&mut self, _service: impl Into<Json>) -> Result<&mut Self> {
        Err(LaunchctlError::Unsupported("MachServices"))
    }

    pub fn add_socket(&mut self, _socket: impl Into<Json>) -> Result<&mut Self> {
        Err(LaunchctlError::Unsupported("Sockets"))
    }

    /// Sets `KeepAlive`. launchd accepts a boolean or a dictionary of
    /// conditions here, so the value is stored as given.
    pub fn set_keep_alive(&mut self, value: impl Into<Json>) -> Result<&mut Self> {
        let value = Value::from_json(&value.into()).ok_or_else(|| {
            LaunchctlError::InvalidArgument("KeepAlive cannot be null".to_string())
        })?;
        Ok(self.insert("KeepAlive", value))
    }

    // ---------------------------------------------------------------------
    // Calendar intervals
    // ---------------------------------------------------------------------

    /// Add a `StartCalendarInterval` entry.
    ///
    /// `interval` must be an object naming at least one of `Minute`, `Hour`,
    /// `Day`, `Weekday` or `Month`. Weekdays may be given by name.
    pub fn add_calendar_interval(&mut self, interval: impl Into<Json>) -> Result<&mut Self> {
        let interval = CalendarInterval::from_json(&interval.into())?;
        debug!(?interval, count = self.calendar.len() + 1, "adding calendar interval");
        self.calendar.push(interval);
        Ok(self)
    }

    /// Remove every calendar interval.
    pub fn delete_calendar_interval(&mut self) -> &mut Self {
        self.calendar.clear();
        self.fields.remove(START_CALENDAR_INTERVAL);
        self
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// The document as a dictionary, with calendar intervals in their
    /// serialized shape: one dictionary for a single interval, an array
    /// otherwise.
    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = self.fields.clone();
        match self.calendar.as_slice() {
            [] => {}
            [single] => {
                dict.insert(START_CALENDAR_INTERVAL.to_string(), Value::Dictionary(single.to_dictionary()));
            }
            many => {
                let items = many.iter().map(|c| Value::Dictionary(c.to_dictionary())).collect();
                dict.insert(START_CALENDAR_INTERVAL.to_string(), Value::Array(items));
            }
        }
        dict
    }

    /// Render the descriptor as an XML property list.
    pub fn serialize(&self) -> String {
        xml::to_xml(&self.to_dictionary())
    }

    /// Clear every field.
    pub fn reset(&mut self) -> &mut Self {
        self.fields.clear();
        self.calendar.clear();
        self
    }
}

/// Calendar intervals only enter through the object and array setters.
fn reject_calendar_key(key: &str) -> Result<()> {
    if key == START_CALENDAR_INTERVAL {
        return Err(LaunchctlError::type_mismatch(key, "a calendar interval object"));
    }
    Ok(())
}

fn truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Json::String(s) => !s.is_empty(),
        Json::Array(_) | Json::Object(_) => true,
    }
}
