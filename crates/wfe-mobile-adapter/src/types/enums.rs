/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Execution status of a process instance.
///
/// The server may report statuses beyond the ones the client knows; those
/// keep their raw value in `Other` so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    Active,
    Ended,
    Suspended,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    /// Query value used by `process/instances?status=`
    pub fn as_query_value(&self) -> &str {
        match self {
            ExecutionStatus::Active => "ACTIVE",
            ExecutionStatus::Ended => "ENDED",
            ExecutionStatus::Suspended => "SUSPENDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Other(raw) => raw,
        }
    }

    fn from_raw(raw: String) -> Self {
        match raw.as_str() {
            "ACTIVE" => ExecutionStatus::Active,
            "ENDED" => ExecutionStatus::Ended,
            "SUSPENDED" => ExecutionStatus::Suspended,
            "FAILED" => ExecutionStatus::Failed,
            _ => ExecutionStatus::Other(raw),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl Serialize for ExecutionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query_value())
    }
}

impl<'de> Deserialize<'de> for ExecutionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ExecutionStatus::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_status_roundtrips_by_name() {
        let status: ExecutionStatus = serde_json::from_str("\"ENDED\"").unwrap();
        assert_eq!(status, ExecutionStatus::Ended);
        assert_eq!(serde_json::to_string(&ExecutionStatus::Active).unwrap(), "\"ACTIVE\"");
    }

    #[test]
    fn test_unrecognized_status_keeps_raw_value() {
        let status: ExecutionStatus = serde_json::from_str("\"ARCHIVED\"").unwrap();
        assert_eq!(status, ExecutionStatus::Other("ARCHIVED".to_string()));
        assert_eq!(status.to_string(), "ARCHIVED");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ARCHIVED\"");
    }
}
