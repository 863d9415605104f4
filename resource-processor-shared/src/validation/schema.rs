//! Per-kind message schemas.

use serde_json::{Map, Value};

use super::reader::{Presence, SchemaReader};
use super::violation::ValidationFailure;
use crate::types::{
    ChallengeId, Envelope, MessageKind, Payload, RegistrationData, ResourceData, ResourceRequest,
};

/// Validate a decoded message against the schema of `kind`.
///
/// The envelope fields (`topic`, `originator`, `timestamp`, `mime-type`, `payload`)
/// are common to all kinds. `payload.type` must equal the kind's literal and the
/// business data is read from `payload.data`, or `payload.detail` for
/// unregistrations.
///
/// # Returns
///
/// * `Ok(Envelope)` - The typed message
/// * `Err(ValidationFailure)` - Every violation found, in reporting order
pub fn validate_message(kind: MessageKind, message: &Value) -> Result<Envelope, ValidationFailure> {
    let mut reader = SchemaReader::new();
    let Some(root) = reader.root(message) else {
        return Err(reader.into_failure());
    };

    let topic = reader.string(root, "topic");
    let originator = reader.string(root, "originator");
    let timestamp = reader.timestamp(root, "timestamp");
    let mime_type = reader.string(root, "mime-type");
    let payload = reader
        .object(root, "payload")
        .and_then(|payload| read_payload(&mut reader, kind, payload));

    match (topic, originator, timestamp, mime_type, payload) {
        (Some(topic), Some(originator), Some(timestamp), Some(mime_type), Some(payload))
            if reader.is_clean() =>
        {
            Ok(Envelope {
                topic,
                originator,
                timestamp,
                mime_type,
                payload,
            })
        }
        _ => Err(reader.into_failure()),
    }
}

fn read_payload(
    reader: &mut SchemaReader,
    kind: MessageKind,
    payload: &Map<String, Value>,
) -> Option<Payload> {
    let type_matches = reader.literal(payload, "payload.type", kind.as_str());
    let data_path = format!("payload.{}", kind.data_key());

    let body = match kind {
        MessageKind::AddResource => {
            read_resource(reader, payload, &data_path).map(Payload::AddResource)
        }
        MessageKind::RemoveResource => {
            read_resource(reader, payload, &data_path).map(Payload::RemoveResource)
        }
        MessageKind::UserRegistration => {
            read_registration(reader, payload, &data_path).map(Payload::UserRegistration)
        }
        MessageKind::UserUnregistration => {
            read_registration(reader, payload, &data_path).map(Payload::UserUnregistration)
        }
    };

    body.filter(|_| type_matches)
}

fn read_resource(
    reader: &mut SchemaReader,
    payload: &Map<String, Value>,
    path: &str,
) -> Option<ResourceData> {
    let data = reader.object(payload, path)?;
    let challenge_id = read_challenge_id(reader, data, path);
    let request_path = format!("{path}.request");
    let request = reader
        .object(data, &request_path)
        .and_then(|request| read_resource_request(reader, request, &request_path));

    Some(ResourceData {
        challenge_id: challenge_id?,
        request: request?,
    })
}

fn read_resource_request(
    reader: &mut SchemaReader,
    request: &Map<String, Value>,
    path: &str,
) -> Option<ResourceRequest> {
    let field = |name: &str| format!("{path}.{name}");

    let role_id = reader.integer(request, &field("roleId"), 1, Presence::Optional);
    let resource_user_id = reader.integer(request, &field("resourceUserId"), 1, Presence::Required);
    let phase_id = reader.integer(request, &field("phaseId"), 0, Presence::Optional);
    let add_notification = reader.boolean(request, &field("addNotification"), Presence::Optional);
    let add_forum_watch = reader.boolean(request, &field("addForumWatch"), Presence::Optional);
    let check_term = reader.boolean(request, &field("checkTerm"), Presence::Optional);
    let studio = reader.boolean(request, &field("studio"), Presence::Optional);

    Some(ResourceRequest {
        resource_user_id: resource_user_id?,
        role_id,
        phase_id,
        add_notification,
        add_forum_watch,
        check_term,
        studio,
    })
}

fn read_registration(
    reader: &mut SchemaReader,
    payload: &Map<String, Value>,
    path: &str,
) -> Option<RegistrationData> {
    let data = reader.object(payload, path)?;
    let challenge_id = read_challenge_id(reader, data, path);
    let user_id = reader.integer(data, &format!("{path}.userId"), 1, Presence::Required);

    Some(RegistrationData {
        challenge_id: challenge_id?,
        user_id: user_id?,
    })
}

fn read_challenge_id(
    reader: &mut SchemaReader,
    data: &Map<String, Value>,
    path: &str,
) -> Option<ChallengeId> {
    reader
        .integer(data, &format!("{path}.challengeId"), 1, Presence::Required)
        .map(ChallengeId::new)
}
