//! Schema validation tests for every message kind.
//!
//! Each case starts from a valid message, breaks one field and checks that the
//! reported violation names that field and the broken rule.

use resource_processor_shared::{ChallengeId, MessageKind, Payload, Rule};
use serde_json::{json, Value};

const CHALLENGE_ID: u64 = 30075466;

fn add_resource_message() -> Value {
    json!({
        "topic": "challenge.notification.events",
        "originator": "some-originator",
        "timestamp": "2018-02-03T00:00:00",
        "mime-type": "application/json",
        "payload": {
            "type": "ADD_RESOURCE",
            "data": {
                "challengeId": CHALLENGE_ID,
                "request": {
                    "roleId": 1,
                    "resourceUserId": 10527204,
                    "phaseId": 0,
                    "addNotification": true,
                    "addForumWatch": true,
                    "checkTerm": false,
                    "studio": false
                }
            }
        }
    })
}

fn remove_resource_message() -> Value {
    json!({
        "topic": "challenge.notification.events",
        "originator": "some-originator",
        "timestamp": "2018-02-03T00:00:00",
        "mime-type": "application/json",
        "payload": {
            "type": "REMOVE_RESOURCE",
            "data": {
                "challengeId": CHALLENGE_ID,
                "request": { "roleId": 1, "resourceUserId": 10527204, "studio": false }
            }
        }
    })
}

fn register_user_message() -> Value {
    json!({
        "topic": "notifications.kafka.queue.java.test",
        "originator": "some-originator",
        "timestamp": "2018-02-03T00:00:00",
        "mime-type": "application/json",
        "payload": {
            "type": "USER_REGISTRATION",
            "data": { "challengeId": CHALLENGE_ID, "userId": 8547899 }
        }
    })
}

fn unregister_user_message() -> Value {
    json!({
        "topic": "notifications.kafka.queue.java.test",
        "originator": "some-originator",
        "timestamp": "2018-02-03T00:00:00",
        "mime-type": "application/json",
        "payload": {
            "type": "USER_UNREGISTRATION",
            "detail": { "challengeId": CHALLENGE_ID, "userId": 8547899 }
        }
    })
}

struct Case {
    kind: MessageKind,
    message: Value,
    required: Vec<&'static str>,
    integers: Vec<&'static str>,
    booleans: Vec<&'static str>,
}

const ENVELOPE_REQUIRED: [&str; 5] = ["topic", "originator", "timestamp", "mime-type", "payload.type"];
const STRING_FIELDS: [&str; 4] = ["topic", "originator", "mime-type", "payload.type"];
const RESOURCE_BOOLEANS: [&str; 4] = [
    "payload.data.request.addNotification",
    "payload.data.request.addForumWatch",
    "payload.data.request.checkTerm",
    "payload.data.request.studio",
];

fn cases() -> Vec<Case> {
    let resource_required = [
        &ENVELOPE_REQUIRED[..],
        &["payload.data.challengeId", "payload.data.request.resourceUserId"][..],
    ]
    .concat();
    let resource_integers = vec![
        "payload.data.challengeId",
        "payload.data.request.resourceUserId",
        "payload.data.request.roleId",
        "payload.data.request.phaseId",
    ];

    vec![
        Case {
            kind: MessageKind::AddResource,
            message: add_resource_message(),
            required: resource_required.clone(),
            integers: resource_integers.clone(),
            booleans: RESOURCE_BOOLEANS.to_vec(),
        },
        Case {
            kind: MessageKind::RemoveResource,
            message: remove_resource_message(),
            required: resource_required,
            integers: resource_integers,
            booleans: RESOURCE_BOOLEANS.to_vec(),
        },
        Case {
            kind: MessageKind::UserRegistration,
            message: register_user_message(),
            required: [
                &ENVELOPE_REQUIRED[..],
                &["payload.data.challengeId", "payload.data.userId"][..],
            ]
            .concat(),
            integers: vec!["payload.data.challengeId", "payload.data.userId"],
            booleans: vec![],
        },
        Case {
            kind: MessageKind::UserUnregistration,
            message: unregister_user_message(),
            required: [
                &ENVELOPE_REQUIRED[..],
                &["payload.detail.challengeId", "payload.detail.userId"][..],
            ]
            .concat(),
            integers: vec!["payload.detail.challengeId", "payload.detail.userId"],
            booleans: vec![],
        },
    ]
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap()
}

/// Set a dotted path, creating intermediate objects.
fn set_path(message: &mut Value, path: &str, value: Value) {
    let mut current = message;
    let segments: Vec<&str> = path.split('.').collect();
    for segment in &segments[..segments.len() - 1] {
        current = current
            .as_object_mut()
            .unwrap()
            .entry(segment.to_string())
            .or_insert_with(|| json!({}));
    }
    current
        .as_object_mut()
        .unwrap()
        .insert(segments[segments.len() - 1].to_string(), value);
}

fn remove_path(message: &mut Value, path: &str) {
    let (parent, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (format!("/{}", parent.replace('.', "/")), key),
        None => (String::new(), path),
    };
    message
        .pointer_mut(&parent)
        .and_then(Value::as_object_mut)
        .unwrap()
        .remove(key);
}

fn assert_rejected_with(kind: MessageKind, message: &Value, expected: &str) {
    let failure = kind
        .validate(message)
        .expect_err(&format!("{kind} should reject message: {message}"));
    assert!(
        failure.contains_message(expected),
        "{kind}: expected {expected:?}, got {failure}"
    );
}

#[test]
fn test_valid_messages_pass() {
    for case in cases() {
        let envelope = case.kind.validate(&case.message).unwrap();
        assert_eq!(envelope.kind(), case.kind);
        assert_eq!(envelope.challenge_id(), ChallengeId::new(CHALLENGE_ID));
        assert_eq!(envelope.originator, "some-originator");
        assert_eq!(envelope.mime_type, "application/json");
    }
}

#[test]
fn test_valid_add_resource_is_fully_typed() {
    let envelope = MessageKind::AddResource
        .validate(&add_resource_message())
        .unwrap();

    let Payload::AddResource(data) = envelope.payload else {
        panic!("expected an add resource payload");
    };
    assert_eq!(data.request.resource_user_id, 10527204);
    assert_eq!(data.request.role_id, Some(1));
    assert_eq!(data.request.phase_id, Some(0));
    assert_eq!(data.request.add_notification, Some(true));
    assert_eq!(data.request.check_term, Some(false));
    assert_eq!(envelope.timestamp.to_rfc3339(), "2018-02-03T00:00:00+00:00");
}

#[test]
fn test_missing_required_field() {
    for case in cases() {
        for path in &case.required {
            let mut message = case.message.clone();
            remove_path(&mut message, path);
            let failure = case.kind.validate(&message).unwrap_err();
            assert_eq!(
                failure.message(),
                format!("\"{}\" is required", last_segment(path)),
                "{} without {path}",
                case.kind
            );
        }
    }
}

#[test]
fn test_missing_nested_object() {
    for case in cases() {
        let data_path = format!("payload.{}", case.kind.data_key());
        let mut message = case.message.clone();
        remove_path(&mut message, &data_path);
        assert_eq!(
            case.kind.validate(&message).unwrap_err().message(),
            format!("\"{}\" is required", case.kind.data_key())
        );
    }

    let mut message = add_resource_message();
    remove_path(&mut message, "payload.data.request");
    assert_eq!(
        MessageKind::AddResource.validate(&message).unwrap_err().message(),
        "\"request\" is required"
    );
}

#[test]
fn test_wrong_payload_type() {
    for case in cases() {
        let mut message = case.message.clone();
        set_path(&mut message, "payload.type", json!("invalid"));
        assert_rejected_with(
            case.kind,
            &message,
            &format!("\"type\" must be one of [{}]", case.kind.as_str()),
        );
    }
}

#[test]
fn test_invalid_timestamp() {
    for case in cases() {
        let mut message = case.message.clone();
        set_path(&mut message, "timestamp", json!("invalid"));
        assert_rejected_with(
            case.kind,
            &message,
            "\"timestamp\" must be a number of milliseconds or valid date string",
        );
    }
}

#[test]
fn test_epoch_millis_timestamp_is_accepted() {
    let mut message = register_user_message();
    set_path(&mut message, "timestamp", json!(1_517_616_000_000u64));
    let envelope = MessageKind::UserRegistration.validate(&message).unwrap();
    assert_eq!(envelope.timestamp.timestamp(), 1_517_616_000);
}

#[test]
fn test_string_fields_reject_numbers() {
    for case in cases() {
        for path in STRING_FIELDS {
            let mut message = case.message.clone();
            set_path(&mut message, path, json!(123));
            assert_rejected_with(
                case.kind,
                &message,
                &format!("\"{}\" must be a string", last_segment(path)),
            );
        }
    }
}

#[test]
fn test_integer_fields() {
    for case in cases() {
        for path in &case.integers {
            let field = last_segment(path);

            let mut message = case.message.clone();
            set_path(&mut message, path, json!("string"));
            assert_rejected_with(case.kind, &message, &format!("\"{field}\" must be a number"));

            let mut message = case.message.clone();
            set_path(&mut message, path, json!(1.1));
            assert_rejected_with(case.kind, &message, &format!("\"{field}\" must be an integer"));

            let min = if field == "phaseId" { 0 } else { 1 };
            let mut message = case.message.clone();
            set_path(&mut message, path, json!(-1));
            assert_rejected_with(
                case.kind,
                &message,
                &format!("\"{field}\" must be larger than or equal to {min}"),
            );
        }
    }
}

#[test]
fn test_zero_ids_are_rejected_but_zero_phase_is_not() {
    let mut message = add_resource_message();
    set_path(&mut message, "payload.data.challengeId", json!(0));
    assert_rejected_with(
        MessageKind::AddResource,
        &message,
        "\"challengeId\" must be larger than or equal to 1",
    );

    let mut message = add_resource_message();
    set_path(&mut message, "payload.data.request.phaseId", json!(0));
    assert!(MessageKind::AddResource.validate(&message).is_ok());
}

#[test]
fn test_boolean_fields() {
    for case in cases() {
        for path in &case.booleans {
            let mut message = case.message.clone();
            set_path(&mut message, path, json!("invalidboolean"));
            assert_rejected_with(
                case.kind,
                &message,
                &format!("\"{}\" must be a boolean", last_segment(path)),
            );
        }
    }
}

#[test]
fn test_unknown_fields_are_ignored() {
    for case in cases() {
        let mut message = case.message.clone();
        set_path(&mut message, "extra", json!("x"));
        set_path(&mut message, "payload.extra", json!({ "nested": true }));
        set_path(
            &mut message,
            &format!("payload.{}.extra", case.kind.data_key()),
            json!([1, 2, 3]),
        );
        assert!(case.kind.validate(&message).is_ok(), "{}", case.kind);
    }
}

#[test]
fn test_unregistration_requires_detail_not_data() {
    let mut message = unregister_user_message();
    let detail = message["payload"]["detail"].take();
    remove_path(&mut message, "payload.detail");
    set_path(&mut message, "payload.data", detail);

    assert_eq!(
        MessageKind::UserUnregistration
            .validate(&message)
            .unwrap_err()
            .message(),
        "\"detail\" is required"
    );
}

#[test]
fn test_all_violations_are_retrievable() {
    let mut message = add_resource_message();
    remove_path(&mut message, "originator");
    set_path(&mut message, "payload.data.request.roleId", json!(1.5));
    set_path(&mut message, "payload.data.request.studio", json!("nope"));

    let failure = MessageKind::AddResource.validate(&message).unwrap_err();
    let rules: Vec<_> = failure.violations().iter().map(|v| v.rule.clone()).collect();

    assert_eq!(failure.message(), "\"originator\" is required");
    assert_eq!(rules, vec![Rule::Required, Rule::Boolean, Rule::Integer]);
}

#[test]
fn test_non_object_message() {
    let failure = MessageKind::AddResource.validate(&json!([1, 2])).unwrap_err();
    assert_eq!(failure.message(), "\"value\" must be an object");
}
