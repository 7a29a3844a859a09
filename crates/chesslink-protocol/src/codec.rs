//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The session layer doesn't care HOW messages are serialized — it holds
//! something that implements [`Codec`] and calls it on every frame.
//!
//! The remote peer speaks JSON, so [`JsonCodec`] is the one shipped today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the connection
/// actor, which is a Tokio task that may run on any worker thread.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON text is what the game server sends and expects, so this is the
/// default. It sits behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use chesslink_protocol::{ClientMessage, Codec, JsonCodec, MoveSearch};
///
/// let codec = JsonCodec;
/// let msg = ClientMessage::from(MoveSearch::new(3));
///
/// let bytes = codec.encode(&msg).unwrap();
/// assert_eq!(bytes, br#"{"messageType":0,"index":3}"#);
///
/// let decoded: ClientMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{InboundMessage, Move, Square};

    fn sq(i: u8) -> Square {
        Square::new(i).unwrap()
    }

    #[test]
    fn test_json_codec_encodes_move_as_camel_case() {
        let mv = Move::new("normal", sq(52), sq(36)).unwrap();
        let bytes = JsonCodec.encode(&mv).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["moveType"], "normal");
        assert_eq!(json["oldSquare"], 52);
        assert_eq!(json["newSquare"], 36);
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<InboundMessage, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
