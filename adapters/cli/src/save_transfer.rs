use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use merge_arena_world::WorldSnapshot;
use thiserror::Error;

const SAVE_DOMAIN: &str = "arena";
const SAVE_VERSION: &str = "v1";

/// Encodes a world snapshot into the shareable `arena:v1:` save string.
pub(crate) fn encode(snapshot: &WorldSnapshot) -> Result<String, SaveTransferError> {
    let json = serde_json::to_vec(snapshot).map_err(SaveTransferError::Serialize)?;
    let payload = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SAVE_DOMAIN}:{SAVE_VERSION}:{payload}"))
}

/// Decodes a save string produced by [`encode`].
///
/// Surrounding whitespace is ignored. The payload may carry base64 padding.
pub(crate) fn decode(value: &str) -> Result<WorldSnapshot, SaveTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SaveTransferError::EmptyInput);
    }

    let mut segments = trimmed.splitn(3, ':');
    let prefix = segments.next().unwrap_or_default();
    if prefix != SAVE_DOMAIN {
        return Err(SaveTransferError::InvalidPrefix(prefix.to_owned()));
    }

    let version = segments.next().ok_or(SaveTransferError::MissingVersion)?;
    if version != SAVE_VERSION {
        return Err(SaveTransferError::UnsupportedVersion(version.to_owned()));
    }

    let payload = segments
        .next()
        .filter(|payload| !payload.is_empty())
        .ok_or(SaveTransferError::MissingPayload)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(SaveTransferError::InvalidEncoding)?;

    serde_json::from_slice(&bytes).map_err(SaveTransferError::InvalidPayload)
}

/// Reasons a save string cannot be produced or read.
#[derive(Debug, Error)]
pub(crate) enum SaveTransferError {
    /// The save string was blank.
    #[error("save string is empty")]
    EmptyInput,
    /// The string does not start with the `arena` domain.
    #[error("save string must start with `arena`, found `{0}`")]
    InvalidPrefix(String),
    /// The version segment is absent.
    #[error("save string is missing its version segment")]
    MissingVersion,
    /// The version segment names a format this build cannot read.
    #[error("unsupported save version `{0}`")]
    UnsupportedVersion(String),
    /// The payload segment is absent or empty.
    #[error("save string is missing its payload")]
    MissingPayload,
    /// The payload is not valid base64.
    #[error("save payload is not valid base64")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload does not describe a world snapshot.
    #[error("save payload is not a valid world snapshot")]
    InvalidPayload(#[source] serde_json::Error),
    /// The snapshot could not be serialized.
    #[error("failed to serialize world snapshot")]
    Serialize(#[source] serde_json::Error),
}
