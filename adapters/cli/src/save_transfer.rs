#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use geocoin_system_persistence::SaveGame;

const TRANSFER_DOMAIN: &str = "geocoin";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub(crate) const TRANSFER_HEADER: &str = "geocoin:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a save record into a single-line string suitable for clipboard
/// transfer between machines.
#[must_use]
pub(crate) fn encode(record: &SaveGame) -> String {
    let json = serde_json::to_vec(record).expect("save record serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!("{TRANSFER_HEADER}:{encoded}")
}

/// Decodes a save record from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<SaveGame, SaveTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SaveTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SaveTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SaveTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(SaveTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(SaveTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(SaveTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SaveTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(SaveTransferError::InvalidPayload)
}

/// Errors that can occur while decoding save transfer strings.
#[derive(Debug)]
pub(crate) enum SaveTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded save.
    MissingPrefix,
    /// The encoded save did not contain a version segment.
    MissingVersion,
    /// The encoded save did not include the payload segment.
    MissingPayload,
    /// The encoded save used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded save used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for SaveTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "transfer payload was empty"),
            Self::MissingPrefix => write!(f, "transfer string is missing the prefix"),
            Self::MissingVersion => write!(f, "transfer string is missing the version"),
            Self::MissingPayload => write!(f, "transfer string is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "transfer prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "transfer version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode transfer payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse transfer payload: {error}")
            }
        }
    }
}

impl Error for SaveTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, SaveTransferError, TRANSFER_HEADER};
    use geocoin_system_persistence::SaveGame;
    use geocoin_world::{World, WorldConfig};

    #[test]
    fn round_trip_fresh_world_record() {
        let record = SaveGame::capture(&World::new(WorldConfig::default()));

        let encoded = encode(&record);
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:")));

        let decoded = decode(&encoded).expect("save decodes");
        assert_eq!(record, decoded);
    }

    #[test]
    fn rejects_foreign_prefixes() {
        let error = decode("maze:v1:e30").expect_err("prefix rejected");
        assert!(matches!(error, SaveTransferError::InvalidPrefix(_)));
    }

    #[test]
    fn rejects_unsupported_versions() {
        let error = decode("geocoin:v9:e30").expect_err("version rejected");
        assert!(matches!(error, SaveTransferError::UnsupportedVersion(_)));
    }

    #[test]
    fn rejects_empty_input() {
        let error = decode("   ").expect_err("empty rejected");
        assert!(matches!(error, SaveTransferError::EmptyPayload));
    }

    #[test]
    fn rejects_garbage_payloads() {
        let error = decode("geocoin:v1:!!!").expect_err("garbage rejected");
        assert!(matches!(error, SaveTransferError::InvalidEncoding(_)));
    }
}
