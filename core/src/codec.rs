//! Binary codec for persisted todo records.
//!
//! # Format
//! A record is a single format-version byte followed by the bincode encoding
//! of the whole aggregate. bincode is not self-describing, so the version
//! byte is what lets `decode` reject blobs written by an incompatible schema
//! instead of misreading them.

use crate::error::CodecError;
use crate::types::Todo;

/// Version byte prepended to every encoded record.
pub const FORMAT_VERSION: u8 = 1;

/// Encode a todo aggregate into an opaque record blob.
pub fn encode(todo: &Todo) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(todo)?;
    let mut buf = Vec::with_capacity(payload.len() + 1);
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a record blob back into a todo aggregate.
pub fn decode(bytes: &[u8]) -> Result<Todo, CodecError> {
    match bytes.split_first() {
        None => Err(CodecError::Truncated),
        Some((&FORMAT_VERSION, payload)) => Ok(bincode::deserialize(payload)?),
        Some((&version, _)) => Err(CodecError::UnsupportedVersion(version)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_todo() -> Todo {
        Todo {
            id: Uuid::new_v4(),
            name: "Plan trip".to_string(),
            description: "Summer holiday".to_string(),
            completed: false,
            due_date: Some(Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap()),
            tasks: vec![
                Task {
                    id: Uuid::new_v4(),
                    name: "Book flights".to_string(),
                    completed: true,
                },
                Task {
                    id: Uuid::new_v4(),
                    name: "Reserve hotel".to_string(),
                    completed: false,
                },
            ],
        }
    }

    #[test]
    fn roundtrips_full_aggregate() {
        let todo = sample_todo();
        let blob = encode(&todo).unwrap();
        assert_eq!(decode(&blob).unwrap(), todo);
    }

    #[test]
    fn roundtrips_absent_due_date_and_empty_tasks() {
        let todo = Todo {
            id: Uuid::new_v4(),
            name: "Bare".to_string(),
            description: String::new(),
            completed: false,
            due_date: None,
            tasks: Vec::new(),
        };
        let blob = encode(&todo).unwrap();
        assert_eq!(decode(&blob).unwrap(), todo);
    }

    #[test]
    fn roundtrips_default_todo() {
        let todo = Todo::default();
        let blob = encode(&todo).unwrap();
        assert_eq!(decode(&blob).unwrap(), todo);
    }

    #[test]
    fn decode_rejects_empty_blob() {
        assert!(matches!(decode(&[]), Err(CodecError::Truncated)));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut blob = encode(&sample_todo()).unwrap();
        blob[0] = 9;
        assert!(matches!(
            decode(&blob),
            Err(CodecError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn decode_rejects_garbage_payload() {
        let blob = [FORMAT_VERSION, 0xde, 0xad];
        assert!(matches!(decode(&blob), Err(CodecError::Malformed(_))));
    }
}
