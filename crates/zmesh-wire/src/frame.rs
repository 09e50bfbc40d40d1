//! Frame building and decoding.
//!
//! Outbound frames are built complete in one pass: the builder collects the
//! sub-command parameters, then [`FrameBuilder::encode`] computes the
//! payload-length byte and appends the transmit options. Inbound frames are
//! decoded from a complete byte slice; the transport owns reassembly, so no
//! streaming buffer is needed at this layer.

use crate::constants::*;
use crate::error::WireError;

// ============================================================================
// Encoding
// ============================================================================

/// Builder for an outbound command frame.
///
/// The payload-length byte counts command class + sub-command + parameters;
/// addressing and transmit options are excluded. The builder fills it in at
/// encode time so callers never compute it by hand.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    node_id: u8,
    command_class: u8,
    sub_command: u8,
    params: Vec<u8>,
    options: TransmitOptions,
}

impl FrameBuilder {
    /// Start a frame for the given destination, class, and sub-command.
    pub fn new(node_id: u8, command_class: u8, sub_command: u8) -> Self {
        FrameBuilder {
            node_id,
            command_class,
            sub_command,
            params: Vec::new(),
            options: TransmitOptions::DEFAULT,
        }
    }

    /// Append one parameter byte.
    pub fn param(mut self, byte: u8) -> Self {
        self.params.push(byte);
        self
    }

    /// Append a run of parameter bytes.
    pub fn params(mut self, bytes: &[u8]) -> Self {
        self.params.extend_from_slice(bytes);
        self
    }

    /// Override the transmit options (all handler traffic uses the default).
    pub fn options(mut self, options: TransmitOptions) -> Self {
        self.options = options;
        self
    }

    /// Encode the frame to bytes.
    pub fn encode(self) -> Result<Vec<u8>, WireError> {
        if self.params.len() > MAX_FRAME_PARAMS {
            return Err(WireError::ParamOverflow {
                count: self.params.len(),
                max: MAX_FRAME_PARAMS,
            });
        }

        let mut buf = Vec::with_capacity(MIN_FRAME_SIZE + self.params.len());
        buf.push(self.node_id);
        buf.push((2 + self.params.len()) as u8);
        buf.push(self.command_class);
        buf.push(self.sub_command);
        buf.extend_from_slice(&self.params);
        buf.push(self.options.bits());
        Ok(buf)
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// A decoded outbound frame, borrowed from the encoded bytes.
///
/// Used by transports and tests to inspect what a handler enqueued; the
/// receive path deals in application payloads (see [`split_app_payload`]),
/// not full frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Destination node address.
    pub node_id: u8,
    /// Capability identifier.
    pub command_class: u8,
    /// Command code within the class.
    pub sub_command: u8,
    /// Sub-command parameters.
    pub params: &'a [u8],
    /// Delivery flags.
    pub options: TransmitOptions,
}

impl<'a> Frame<'a> {
    /// Decode a complete frame.
    pub fn decode(bytes: &'a [u8]) -> Result<Self, WireError> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(WireError::truncated(MIN_FRAME_SIZE, bytes.len()));
        }

        let declared = bytes[FRAME_OFFSET_LENGTH] as usize;
        let actual = bytes.len() - FRAME_OVERHEAD;
        if declared != actual {
            return Err(WireError::LengthMismatch { declared, actual });
        }

        Ok(Frame {
            node_id: bytes[FRAME_OFFSET_NODE_ID],
            command_class: bytes[FRAME_OFFSET_COMMAND_CLASS],
            sub_command: bytes[FRAME_OFFSET_SUB_COMMAND],
            params: &bytes[FRAME_OFFSET_PARAMS..bytes.len() - 1],
            options: TransmitOptions::from_bits_truncate(bytes[bytes.len() - 1]),
        })
    }
}

/// Split an inbound application payload into its sub-command code and data.
///
/// Inbound payloads arrive with addressing already stripped by the
/// transport: `[sub_command, data...]`.
pub fn split_app_payload(payload: &[u8]) -> Result<(u8, &[u8]), WireError> {
    match payload.split_first() {
        Some((&sub, data)) => Ok((sub, data)),
        None => Err(WireError::EmptyPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parameterless_frame() {
        let frame = FrameBuilder::new(7, COMMAND_CLASS_TOGGLE_LEVEL, 0x02)
            .encode()
            .unwrap();
        assert_eq!(frame, vec![7, 2, 0x29, 0x02, 0x05]);
    }

    #[test]
    fn test_encode_frame_with_params() {
        let frame = FrameBuilder::new(3, COMMAND_CLASS_TOGGLE_LEVEL, 0x04)
            .param(0x21)
            .encode()
            .unwrap();
        // Length byte counts class + sub-command + one param.
        assert_eq!(frame, vec![3, 3, 0x29, 0x04, 0x21, 0x05]);
    }

    #[test]
    fn test_encode_rejects_param_overflow() {
        let big = vec![0u8; MAX_FRAME_PARAMS + 1];
        let err = FrameBuilder::new(1, 0x29, 0x01)
            .params(&big)
            .encode()
            .unwrap_err();
        assert!(matches!(err, WireError::ParamOverflow { .. }));
    }

    #[test]
    fn test_decode_round_trip() {
        let encoded = FrameBuilder::new(9, COMMAND_CLASS_TOGGLE_BINARY, 0x01)
            .params(&[0xAA, 0xBB])
            .encode()
            .unwrap();
        let frame = Frame::decode(&encoded).unwrap();
        assert_eq!(frame.node_id, 9);
        assert_eq!(frame.command_class, COMMAND_CLASS_TOGGLE_BINARY);
        assert_eq!(frame.sub_command, 0x01);
        assert_eq!(frame.params, &[0xAA, 0xBB]);
        assert_eq!(frame.options, TransmitOptions::DEFAULT);
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        let err = Frame::decode(&[1, 2, 0x29]).unwrap_err();
        assert_eq!(err, WireError::truncated(MIN_FRAME_SIZE, 3));
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        // Length byte claims 4 payload bytes but only 2 are present.
        let err = Frame::decode(&[1, 4, 0x29, 0x02, 0x05]).unwrap_err();
        assert_eq!(
            err,
            WireError::LengthMismatch {
                declared: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_split_app_payload() {
        let (sub, data) = split_app_payload(&[0x03, 0x2A]).unwrap();
        assert_eq!(sub, 0x03);
        assert_eq!(data, &[0x2A]);

        assert_eq!(split_app_payload(&[]).unwrap_err(), WireError::EmptyPayload);
    }
}
