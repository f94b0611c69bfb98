use super::*;
use serde_json::json;

#[test]
fn test_exit_codes() {
    assert_eq!(Status::Ok.exit_code(), 0);
    assert_eq!(Status::Skipped.exit_code(), 0);
    assert_eq!(Status::Error.exit_code(), 1);
    assert_eq!(Status::RollbackRequired.exit_code(), 2);
}

#[test]
fn test_body_fields_are_merged_and_status_replaced() {
    let body = json!({ "status": "failed", "stage": "push", "violations": [] });

    let report = CommandReport::new(Status::Error, &body).unwrap();
    let value = report.to_value();

    assert_eq!(value["status"], "error");
    assert_eq!(value["stage"], "push");
    assert!(value["violations"].as_array().unwrap().is_empty());
}

#[test]
fn test_non_object_body_is_wrapped() {
    let report = CommandReport::new(Status::Ok, &vec!["a", "b"]).unwrap();
    assert_eq!(report.get("result"), Some(&json!(["a", "b"])));
}

#[test]
fn test_error_report() {
    let report = CommandReport::from_error(&Error::InvalidArguments("bad".to_string()));

    assert_eq!(report.exit_code(), 1);
    let parsed: Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(parsed["status"], "error");
    assert_eq!(parsed["error"], "Invalid arguments: bad");
}
