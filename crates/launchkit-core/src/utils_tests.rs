use super::*;
use serde_json::json;

#[test]
fn test_weekday_names() {
    assert_eq!(normalize_weekday(&json!("sunday")).unwrap(), 0);
    assert_eq!(normalize_weekday(&json!("Monday")).unwrap(), 1);
    assert_eq!(normalize_weekday(&json!("SATURDAY")).unwrap(), 6);
}

#[test]
fn test_weekday_integer_passthrough() {
    assert_eq!(normalize_weekday(&json!(3)).unwrap(), 3);
    assert_eq!(normalize_weekday(&json!(7)).unwrap(), 7);
    assert_eq!(normalize_weekday(&json!(2.0)).unwrap(), 2);
}

#[test]
fn test_weekday_rejects_garbage() {
    assert!(matches!(
        normalize_weekday(&json!("funday")),
        Err(LaunchctlError::InvalidWeekday(_))
    ));
    assert!(matches!(
        normalize_weekday(&json!(true)),
        Err(LaunchctlError::InvalidWeekday(_))
    ));
    assert!(matches!(
        normalize_weekday(&json!(1.5)),
        Err(LaunchctlError::InvalidWeekday(_))
    ));
    // Numeric strings are names, not numbers.
    assert!(normalize_weekday(&json!("1")).is_err());
}

#[test]
fn test_to_number() {
    assert_eq!(to_number(&json!(42)), Some(42.0));
    assert_eq!(to_number(&json!(" 18 ")), Some(18.0));
    assert_eq!(to_number(&json!("0.25")), Some(0.25));
    assert_eq!(to_number(&json!(true)), Some(1.0));
    assert_eq!(to_number(&json!(false)), Some(0.0));
}

#[test]
fn test_to_number_zero_is_valid() {
    assert_eq!(to_number(&json!(0)), Some(0.0));
    assert_eq!(to_number(&json!("0")), Some(0.0));
}

#[test]
fn test_to_number_rejects() {
    assert_eq!(to_number(&json!("abc")), None);
    assert_eq!(to_number(&json!("")), None);
    assert_eq!(to_number(&json!([1])), None);
    assert_eq!(to_number(&json!({"a": 1})), None);
    assert_eq!(to_number(&json!(null)), None);
    assert_eq!(to_number(&json!("inf")), None);
}

#[test]
fn test_is_empty_document() {
    assert!(is_empty_document(&json!([])));
    assert!(is_empty_document(&json!([1, 2])));
    assert!(is_empty_document(&json!("text")));
    assert!(is_empty_document(&json!(5)));
    assert!(is_empty_document(&json!({})));
    assert!(!is_empty_document(&json!({"Hour": 1})));
}

#[test]
fn test_integral() {
    assert_eq!(integral(4.0), Some(4));
    assert_eq!(integral(4.5), None);
    assert_eq!(integral(f64::NAN), None);
}
