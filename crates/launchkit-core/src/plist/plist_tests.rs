use super::*;
use crate::error::LaunchctlError;
use serde_json::json;

#[test]
fn test_boolean_setter_accepts_booleans() {
    let mut job = JobDescriptor::new();
    job.set_run_at_load(true).unwrap();
    job.set_disabled(false).unwrap();
    assert_eq!(job.get("RunAtLoad"), Some(&Value::Boolean(true)));
    assert_eq!(job.get("Disabled"), Some(&Value::Boolean(false)));
}

#[test]
fn test_boolean_setter_rejects_other_kinds() {
    let mut job = JobDescriptor::new();
    for bad in [json!("true"), json!(1), json!(null), json!([true]), json!({"a": true})] {
        let err = job.set_debug(bad).unwrap_err();
        assert!(matches!(err, LaunchctlError::TypeMismatch { .. }));
    }
    assert!(job.is_empty());
}

#[test]
fn test_string_setter_stringifies_numbers() {
    let mut job = JobDescriptor::new();
    job.set_user_name(501).unwrap();
    assert_eq!(job.get("UserName"), Some(&Value::String("501".to_string())));
}

#[test]
fn test_string_setter_rejects_booleans() {
    let mut job = JobDescriptor::new();
    let err = job.set_label(true).unwrap_err();
    assert_eq!(
        err,
        LaunchctlError::TypeMismatch {
            field: "Label".to_string(),
            expected: "a string"
        }
    );
}

#[test]
fn test_string_allow_list() {
    let mut job = JobDescriptor::new();
    job.set_process_type("Adaptive").unwrap();
    job.set_limit_load_to_session_type("Aqua").unwrap();

    let err = job.set_process_type("adaptive").unwrap_err();
    assert!(matches!(err, LaunchctlError::ConstraintViolation { .. }));
    assert_eq!(job.get("ProcessType"), Some(&Value::String("Adaptive".to_string())));

    assert!(job.set_limit_load_to_session_type("Desktop").is_err());
}

#[test]
fn test_string_empty_allow_list_is_unconstrained() {
    let mut job = JobDescriptor::new();
    job.add_string("Custom", "anything", Some(&[])).unwrap();
    assert_eq!(job.get("Custom"), Some(&Value::String("anything".to_string())));
}

#[test]
fn test_number_setter_coerces() {
    let mut job = JobDescriptor::new();
    job.set_nice(5).unwrap();
    job.set_timeout("30").unwrap();
    job.set_exit_timeout(true).unwrap();
    job.set_throttle_interval(2.5).unwrap();
    job.set_umask(0).unwrap();
    assert_eq!(job.get("Nice"), Some(&Value::Integer(5)));
    assert_eq!(job.get("TimeOut"), Some(&Value::Integer(30)));
    assert_eq!(job.get("ExitTimeOut"), Some(&Value::Integer(1)));
    assert_eq!(job.get("ThrottleInterval"), Some(&Value::Real(2.5)));
    assert_eq!(job.get("Umask"), Some(&Value::Integer(0)));
}

#[test]
fn test_number_setter_rejects() {
    let mut job = JobDescriptor::new();
    for bad in [json!("ten"), json!([1]), json!({"n": 1}), json!(null), json!("")] {
        assert!(job.set_start_interval(bad).is_err());
    }
    assert!(job.get("StartInterval").is_none());
}

#[test]
fn test_array_setter_wraps_scalars() {
    let mut job = JobDescriptor::new();
    job.set_watch_paths("/tmp/watched");
    assert_eq!(
        job.get("WatchPaths"),
        Some(&Value::Array(vec![Value::String("/tmp/watched".to_string())]))
    );

    job.set_queue_directories(json!({"path": "/var/spool"}));
    let queue = job.get("QueueDirectories").and_then(Value::as_array).unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue[0].as_dictionary().is_some());
}

#[test]
fn test_array_setter_falsy_is_empty() {
    let mut job = JobDescriptor::new();
    for falsy in [json!(null), json!(""), json!(false), json!(0)] {
        job.set_limit_load_to_hosts(falsy);
        assert_eq!(job.get("LimitLoadToHosts"), Some(&Value::Array(vec![])));
    }
}

#[test]
fn test_array_setter_keeps_arrays() {
    let mut job = JobDescriptor::new();
    job.set_program_args(vec!["a", "b", "a"]);
    assert_eq!(
        job.get("ProgramArguments"),
        Some(&Value::from(vec!["a", "b", "a"]))
    );
}

#[test]
fn test_object_setter() {
    let mut job = JobDescriptor::new();
    job.set_environment_variables(json!({"PATH": "/usr/bin"})).unwrap();
    let env = job.get("EnvironmentVariables").and_then(Value::as_dictionary).unwrap();
    assert_eq!(env.get("PATH").and_then(Value::as_str), Some("/usr/bin"));

    assert!(job.set_environment_variables(json!(["PATH"])).is_err());
    assert!(job.set_environment_variables("PATH=/bin").is_err());
    assert!(job.set_environment_variables(json!(null)).is_err());
}

#[test]
fn test_unsupported_operations() {
    let mut job = JobDescriptor::new();
    assert_eq!(
        job.add_mach_service(json!({"com.test": true})).unwrap_err(),
        LaunchctlError::Unsupported("MachServices")
    );
    assert!(matches!(job.add_socket(json!({})), Err(LaunchctlError::Unsupported(_))));
    assert!(matches!(
        job.set_soft_resource_limits(json!({"NumberOfFiles": 10})),
        Err(LaunchctlError::Unsupported(_))
    ));
    assert!(matches!(
        job.set_hard_resource_limits(json!({})),
        Err(LaunchctlError::Unsupported(_))
    ));
}

#[test]
fn test_keep_alive_is_polymorphic() {
    let mut job = JobDescriptor::new();
    job.set_keep_alive(true).unwrap();
    assert_eq!(job.get("KeepAlive"), Some(&Value::Boolean(true)));
    job.set_keep_alive(json!({"SuccessfulExit": false})).unwrap();
    assert!(job.get("KeepAlive").and_then(Value::as_dictionary).is_some());
    job.set_keep_alive("yes").unwrap();
    assert_eq!(job.get("KeepAlive"), Some(&Value::String("yes".to_string())));
    assert!(job.set_keep_alive(json!(null)).is_err());
}

#[test]
fn test_inetd_compatibility_wait() {
    let mut job = JobDescriptor::new();
    job.set_inetd_compatibility_wait(true).unwrap();
    let inetd = job.get("inetdCompatibility").and_then(Value::as_dictionary).unwrap();
    assert_eq!(inetd.get("Wait"), Some(&Value::Boolean(true)));
    assert!(job.set_inetd_compatibility_wait("no").is_err());
}

#[test]
fn test_calendar_interval_empty() {
    let mut job = JobDescriptor::new();
    assert_eq!(
        job.add_calendar_interval(json!({})).unwrap_err(),
        LaunchctlError::EmptyConstraint
    );
    assert_eq!(
        job.add_calendar_interval(json!({"Second": 4})).unwrap_err(),
        LaunchctlError::EmptyConstraint
    );
}

#[test]
fn test_calendar_interval_not_an_object() {
    let mut job = JobDescriptor::new();
    assert!(matches!(
        job.add_calendar_interval("daily"),
        Err(LaunchctlError::InvalidArgument(_))
    ));
    assert!(matches!(
        job.add_calendar_interval(json!([{"Hour": 1}])),
        Err(LaunchctlError::InvalidArgument(_))
    ));
}

#[test]
fn test_calendar_interval_weekday_name() {
    let mut job = JobDescriptor::new();
    job.add_calendar_interval(json!({"Weekday": "monday"})).unwrap();
    let dict = job.to_dictionary();
    let interval = dict.get(START_CALENDAR_INTERVAL).and_then(Value::as_dictionary).unwrap();
    assert_eq!(interval.get("Weekday"), Some(&Value::Integer(1)));
}

#[test]
fn test_calendar_interval_zero_is_valid() {
    let mut job = JobDescriptor::new();
    job.add_calendar_interval(json!({"Minute": 0, "Hour": "0"})).unwrap();
    assert_eq!(
        job.calendar_intervals(),
        &[CalendarInterval {
            minute: Some(0),
            hour: Some(0),
            ..Default::default()
        }]
    );
}

#[test]
fn test_calendar_interval_bad_fields() {
    let mut job = JobDescriptor::new();
    assert!(matches!(
        job.add_calendar_interval(json!({"Hour": "noon"})),
        Err(LaunchctlError::TypeMismatch { .. })
    ));
    assert!(matches!(
        job.add_calendar_interval(json!({"Minute": 1.5})),
        Err(LaunchctlError::TypeMismatch { .. })
    ));
    assert!(matches!(
        job.add_calendar_interval(json!({"Hour": 1, "Weekday": "someday"})),
        Err(LaunchctlError::InvalidWeekday(_))
    ));
    assert!(job.calendar_intervals().is_empty());
}

#[test]
fn test_calendar_interval_accumulates() {
    let mut job = JobDescriptor::new();
    job.add_calendar_interval(json!({"Hour": 3})).unwrap();
    job.add_calendar_interval(json!({"Hour": 15, "Weekday": "Friday"})).unwrap();

    let dict = job.to_dictionary();
    let intervals = dict.get(START_CALENDAR_INTERVAL).and_then(Value::as_array).unwrap();
    assert_eq!(intervals.len(), 2);
    assert_eq!(
        intervals[0].as_dictionary().and_then(|d| d.get("Hour")),
        Some(&Value::Integer(3))
    );
    assert_eq!(
        intervals[1].as_dictionary().and_then(|d| d.get("Weekday")),
        Some(&Value::Integer(5))
    );

    job.add_calendar_interval(json!({"Day": 1})).unwrap();
    assert_eq!(job.calendar_intervals().len(), 3);
}

#[test]
fn test_failed_calendar_interval_keeps_previous() {
    let mut job = JobDescriptor::new();
    job.add_calendar_interval(json!({"Hour": 3})).unwrap();
    assert!(job.add_calendar_interval(json!({"Month": "june"})).is_err());
    assert_eq!(job.calendar_intervals().len(), 1);
}

#[test]
fn test_delete_calendar_interval() {
    let mut job = JobDescriptor::new();
    job.delete_calendar_interval();
    job.add_calendar_interval(json!({"Hour": 3})).unwrap();
    job.add_calendar_interval(json!({"Hour": 4})).unwrap();
    job.delete_calendar_interval();
    assert!(job.to_dictionary().get(START_CALENDAR_INTERVAL).is_none());
}

#[test]
fn test_reset() {
    let mut job = JobDescriptor::new();
    job.set_label("com.test.reset").unwrap();
    job.add_calendar_interval(json!({"Hour": 3})).unwrap();
    job.reset();
    assert!(job.is_empty());
    assert_eq!(job.serialize(), JobDescriptor::new().serialize());
}

#[test]
fn test_scenario_echo_job() {
    let mut job = JobDescriptor::new();
    job.set_label("com.test.job")
        .unwrap()
        .set_program("/bin/echo")
        .unwrap()
        .set_program_args(vec!["hello"])
        .set_run_at_load(true)
        .unwrap();

    let parsed = parse(&job.serialize()).unwrap();
    let keys: Vec<&str> = parsed.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Label", "Program", "ProgramArguments", "RunAtLoad"]);
    assert_eq!(parsed["Label"], Value::String("com.test.job".to_string()));
    assert_eq!(parsed["Program"], Value::String("/bin/echo".to_string()));
    assert_eq!(parsed["ProgramArguments"], Value::from(vec!["hello"]));
    assert_eq!(parsed["RunAtLoad"], Value::Boolean(true));
}

#[test]
fn test_serialize_format() {
    let mut job = JobDescriptor::new();
    job.set_label("com.test.fmt").unwrap();
    job.set_watch_paths(json!(null));
    let xml = job.serialize();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains("<!DOCTYPE plist PUBLIC"));
    assert!(xml.contains("    <key>Label</key>\n    <string>com.test.fmt</string>\n"));
    assert!(xml.contains("<array/>"));
    assert!(xml.ends_with("</dict>\n</plist>\n"));
}

#[test]
fn test_serialize_is_deterministic() {
    let mut a = JobDescriptor::new();
    a.set_program("/bin/true").unwrap();
    a.set_label("com.test.order").unwrap();
    let mut b = JobDescriptor::new();
    b.set_label("com.test.order").unwrap();
    b.set_program("/bin/true").unwrap();
    assert_eq!(a.serialize(), b.serialize());
}

#[test]
fn test_serialize_escapes_text() {
    let mut job = JobDescriptor::new();
    job.set_program_args(vec!["echo", "a < b && c > \"d\""]);
    let xml = job.serialize();
    assert!(xml.contains("a &lt; b &amp;&amp; c &gt; &quot;d&quot;"));
    let parsed = parse(&xml).unwrap();
    assert_eq!(parsed["ProgramArguments"], Value::from(vec!["echo", "a < b && c > \"d\""]));
}

#[test]
fn test_round_trip() {
    let mut job = JobDescriptor::new();
    job.set_label("com.test.roundtrip").unwrap();
    job.set_stdout_path("/tmp/out.log").unwrap();
    job.set_nice(-5).unwrap();
    job.set_throttle_interval("0.5").unwrap();
    job.set_low_priority_io(true).unwrap();
    job.set_launch_only_once(false).unwrap();
    job.set_program_args(json!(["/bin/sh", "-c", "exit 0"]));
    job.set_limit_load_from_hosts(json!(null));
    job.set_environment_variables(json!({"HOME": "/var/empty", "NESTED": {"deep": [1, 2]}}))
        .unwrap();
    job.add_calendar_interval(json!({"Hour": 2, "Minute": 30})).unwrap();
    job.add_calendar_interval(json!({"Weekday": "sunday"})).unwrap();

    let xml = job.serialize();
    assert_eq!(parse(&xml).unwrap(), job.to_dictionary());

    let restored = JobDescriptor::from_xml(&xml).unwrap();
    assert_eq!(restored, job);
}

#[test]
fn test_from_dictionary_single_calendar() {
    let mut seed = Dictionary::new();
    seed.insert("Label".to_string(), Value::from("com.test.seed"));
    let cal = Dictionary::from([("Hour".to_string(), Value::Integer(9))]);
    seed.insert(START_CALENDAR_INTERVAL.to_string(), Value::Dictionary(cal));

    let mut job = JobDescriptor::from_dictionary(seed).unwrap();
    assert_eq!(job.calendar_intervals().len(), 1);
    job.add_calendar_interval(json!({"Hour": 21})).unwrap();
    assert!(job.to_dictionary()[START_CALENDAR_INTERVAL].as_array().is_some());
}

#[test]
fn test_from_dictionary_rejects_bad_calendar() {
    let seed = Dictionary::from([(START_CALENDAR_INTERVAL.to_string(), Value::from("hourly"))]);
    assert!(JobDescriptor::from_dictionary(seed).is_err());
}

#[test]
fn test_parse_rejects_malformed() {
    assert!(parse("").is_err());
    assert!(parse("<plist><array/></plist>").is_err());
    assert!(parse("<dict><key>A</key><string>unterminated</dict>").is_err());
    assert!(parse("<dict><key>A</key><date>2024-01-01T00:00:00Z</date></dict>").is_err());
}

#[test]
fn test_parse_accepts_apple_layout() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
        <plist version=\"1.0\">\n\
        <dict>\n\
        \t<!-- comment -->\n\
        \t<key>Label</key>\n\
        \t<string>com.apple.test &#38; co</string>\n\
        \t<key>KeepAlive</key>\n\
        \t<dict/>\n\
        \t<key>Empty</key>\n\
        \t<string/>\n\
        </dict>\n\
        </plist>\n";
    let dict = parse(xml).unwrap();
    assert_eq!(dict["Label"], Value::from("com.apple.test & co"));
    assert_eq!(dict["KeepAlive"], Value::Dictionary(Dictionary::new()));
    assert_eq!(dict["Empty"], Value::from(""));
}

#[test]
fn test_string_setter_drops_fraction_of_whole_floats() {
    let mut job = JobDescriptor::new();
    job.set_user_name(1.0).unwrap();
    assert_eq!(job.get("UserName"), Some(&Value::from("1")));
    job.set_group_name(1.5).unwrap();
    assert_eq!(job.get("GroupName"), Some(&Value::from("1.5")));
}

#[test]
fn test_generic_object_setter_feeds_calendar() {
    let mut job = JobDescriptor::new();
    job.add_object(START_CALENDAR_INTERVAL, json!({"Hour": 1})).unwrap();
    assert!(job.get(START_CALENDAR_INTERVAL).is_none());
    assert_eq!(job.calendar_intervals().len(), 1);

    job.add_calendar_interval(json!({"Minute": 5})).unwrap();
    let intervals = job.calendar_intervals();
    assert_eq!(intervals.len(), 2);
    assert_eq!(intervals[0].hour, Some(1));
    assert_eq!(intervals[1].minute, Some(5));
}

#[test]
fn test_generic_setters_cannot_bypass_calendar() {
    let mut job = JobDescriptor::new();
    assert!(job.add_string(START_CALENDAR_INTERVAL, "hourly", None).is_err());
    assert!(job.add_boolean(START_CALENDAR_INTERVAL, true).is_err());
    assert!(job.add_number(START_CALENDAR_INTERVAL, 5).is_err());
    assert!(job.add_object(START_CALENDAR_INTERVAL, json!({})).is_err());
    assert!(job.is_empty());

    job.add_array(START_CALENDAR_INTERVAL, json!([{"Hour": 1}, {"Weekday": "friday"}]));
    assert_eq!(job.calendar_intervals().len(), 2);

    job.add_array(START_CALENDAR_INTERVAL, json!([{"Hour": "noon"}]));
    assert_eq!(job.calendar_intervals().len(), 2);
}

#[test]
fn test_delete_calendar_removes_key_set_generically() {
    let mut job = JobDescriptor::new();
    job.set_label("com.test.cal").unwrap();
    job.add_object(START_CALENDAR_INTERVAL, json!({"Hour": 1})).unwrap();
    job.delete_calendar_interval();
    assert!(!job.serialize().contains(START_CALENDAR_INTERVAL));
    assert!(job.to_dictionary().get(START_CALENDAR_INTERVAL).is_none());
}

#[test]
fn test_parse_rejects_deep_nesting() {
    let depth = 100_000;
    let xml = format!(
        "<dict><key>A</key>{}{}</dict>",
        "<array>".repeat(depth),
        "</array>".repeat(depth)
    );
    match parse(&xml) {
        Err(LaunchctlError::InvalidArgument(msg)) => assert!(msg.contains("nesting too deep")),
        other => panic!("expected nesting error, got {:?}", other),
    }
}

#[test]
fn test_parse_accepts_moderate_nesting() {
    let depth = 32;
    let xml = format!(
        "<dict><key>A</key>{}<true/>{}</dict>",
        "<array>".repeat(depth),
        "</array>".repeat(depth)
    );
    assert!(parse(&xml).is_ok());
}
