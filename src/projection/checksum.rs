use serde::{Deserialize, Serialize};

/// Hash algorithm the server used for a C# projection checksum.
///
/// Serialized as the numeric code the server sends on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChecksumAlgorithm {
    #[default]
    None,
    Sha1,
    Sha256,
}

impl TryFrom<u8> for ChecksumAlgorithm {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChecksumAlgorithm::None),
            1 => Ok(ChecksumAlgorithm::Sha1),
            2 => Ok(ChecksumAlgorithm::Sha256),
            other => Err(format!("unknown checksum algorithm: {other}")),
        }
    }
}

impl From<ChecksumAlgorithm> for u8 {
    fn from(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::None => 0,
            ChecksumAlgorithm::Sha1 => 1,
            ChecksumAlgorithm::Sha256 => 2,
        }
    }
}

/// Checksum metadata for the generated C# text.
///
/// The C# workspace compares it against its own copy of the generated
/// document before accepting edits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksumInfo {
    pub checksum: String,
    pub checksum_algorithm: ChecksumAlgorithm,
    pub encoding_code_page: Option<i32>,
}

impl ChecksumInfo {
    pub fn new(
        checksum: impl Into<String>,
        checksum_algorithm: ChecksumAlgorithm,
        encoding_code_page: Option<i32>,
    ) -> Self {
        Self {
            checksum: checksum.into(),
            checksum_algorithm,
            encoding_code_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_uses_numeric_wire_codes() {
        let algorithm: ChecksumAlgorithm = serde_json::from_str("2").unwrap();
        assert_eq!(algorithm, ChecksumAlgorithm::Sha256);
        assert_eq!(serde_json::to_string(&ChecksumAlgorithm::Sha1).unwrap(), "1");
        assert!(serde_json::from_str::<ChecksumAlgorithm>("7").is_err());
    }

    #[test]
    fn checksum_info_is_camel_case() {
        let info: ChecksumInfo = serde_json::from_value(serde_json::json!({
            "checksum": "AB12",
            "checksumAlgorithm": 1,
            "encodingCodePage": null,
        }))
        .unwrap();
        assert_eq!(info, ChecksumInfo::new("AB12", ChecksumAlgorithm::Sha1, None));
    }
}
