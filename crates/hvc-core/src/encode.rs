//! Encoding between the in-memory version list and the JSON document held by
//! the persistence collaborator.
//!
//! The document is a JSON array of version objects with camelCase keys.
//! Anything else is rejected before individual records are decoded.

use crate::{Error, Result, version::Version};

/// The single key the whole journal lives under.
pub const VERSIONS_KEY: &str = "versions";

/// Where an unreadable journal is copied before it is first overwritten.
pub const BACKUP_KEY: &str = "versions.backup";

/// A decoded journal document.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
  pub versions:    Vec<Version>,
  /// Records that carried no `id` and were given a fresh one.
  pub missing_ids: usize,
}

pub fn encode_versions(versions: &[Version]) -> Result<String> {
  Ok(serde_json::to_string(versions)?)
}

pub fn decode_versions(raw: &str) -> Result<Vec<Version>> {
  Ok(decode_document(raw)?.versions)
}

pub fn decode_document(raw: &str) -> Result<Decoded> {
  let doc: serde_json::Value = serde_json::from_str(raw)?;
  let Some(records) = doc.as_array() else {
    return Err(Error::MalformedData(format!(
      "expected an array, found {}",
      json_kind(&doc)
    )));
  };
  let missing_ids = records.iter().filter(|r| r.get("id").is_none()).count();
  Ok(Decoded { versions: serde_json::from_value(doc)?, missing_ids })
}

fn json_kind(v: &serde_json::Value) -> &'static str {
  match v {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_non_array_documents() {
    for raw in ["{}", "null", "\"versions\"", "42"] {
      assert!(
        matches!(decode_versions(raw), Err(Error::MalformedData(_))),
        "{raw} should be rejected"
      );
    }
  }

  #[test]
  fn rejects_unparseable_documents() {
    assert!(matches!(
      decode_versions("[{\"name\": "),
      Err(Error::Serialization(_))
    ));
  }

  #[test]
  fn rejects_arrays_of_non_objects() {
    assert!(decode_versions("[1, 2]").is_err());
  }

  #[test]
  fn counts_records_without_ids() {
    let raw = r#"[
      {"name":"old","date":"1/5/2026"},
      {"id":"4f9d3c1e-8b2a-4c6d-9e0f-1a2b3c4d5e6f","name":"new"}
    ]"#;
    let decoded = decode_document(raw).unwrap();
    assert_eq!(decoded.versions.len(), 2);
    assert_eq!(decoded.missing_ids, 1);
    assert_eq!(decode_document("[]").unwrap().missing_ids, 0);
  }

  #[test]
  fn empty_array_is_an_empty_journal() {
    assert!(decode_versions("[]").unwrap().is_empty());
  }

  #[test]
  fn encoded_form_uses_camel_case_keys() {
    let v: Version = serde_json::from_str(
      r#"{"name":"v1","date":"1/2/2026","createdAt":"2026-01-02T10:00:00Z"}"#,
    )
    .unwrap();
    let raw = encode_versions(std::slice::from_ref(&v)).unwrap();
    assert!(raw.contains("\"createdAt\""));
    assert!(raw.contains("\"id\""));
    assert!(!raw.contains("version_id"));
    assert_eq!(decode_versions(&raw).unwrap(), vec![v]);
  }
}
