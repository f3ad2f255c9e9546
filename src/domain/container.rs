//! Container records supplied by the depot application

use serde::{Deserialize, Serialize};

/// A container known to the depot
///
/// Records are owned by the caller and treated as read-only. Two records may
/// share a `number`; identity is always `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub status: String,
    /// Free-text position, e.g. "Block A / Stack S5 / Tier 2"
    pub location: String,
    pub client_code: String,
}

impl ContainerRecord {
    pub fn new(id: impl Into<String>, number: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            kind: "DRY".to_string(),
            size: "20ft".to_string(),
            status: "IN_DEPOT".to_string(),
            location: location.into(),
            client_code: String::new(),
        }
    }

    pub fn with_client(mut self, client_code: impl Into<String>) -> Self {
        self.client_code = client_code.into();
        self
    }

    pub fn with_details(
        mut self,
        kind: impl Into<String>,
        size: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        self.kind = kind.into();
        self.size = size.into();
        self.status = status.into();
        self
    }

    /// Same record by identity
    pub fn same_as(&self, other: &ContainerRecord) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_id_not_number() {
        let a = ContainerRecord::new("1", "MSCU1234567", "Stack S1");
        let b = ContainerRecord::new("2", "MSCU1234567", "Stack S1");
        assert!(!a.same_as(&b));
        assert!(a.same_as(&a.clone().with_client("MSC")));
    }

    #[test]
    fn deserializes_type_field() {
        let record: ContainerRecord = toml::from_str(
            r#"
            id = "c1"
            number = "TGHU0000001"
            type = "REEFER"
            size = "40ft"
            status = "IN_DEPOT"
            location = "Stack S3"
            client_code = "CMA"
            "#,
        )
        .unwrap();
        assert_eq!(record.kind, "REEFER");
        assert_eq!(record.client_code, "CMA");
    }
}
