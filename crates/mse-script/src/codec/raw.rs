//! Raw payload passthrough: `i32 length` followed by that many bytes.

use log::debug;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::RawPayload;

/// Decodes the raw payload verbatim.
pub fn decode_raw(reader: &mut Reader<'_>) -> Result<RawPayload, DecodeError> {
    let len = reader.read_len_i32("raw payload length")?;
    let bytes = reader.read_bytes(len, "raw payload")?;
    debug!("raw payload: {} bytes", len);
    Ok(RawPayload(bytes.to_vec()))
}

/// Encodes the raw payload verbatim.
pub fn encode_raw(writer: &mut Writer, raw: &RawPayload) -> Result<(), EncodeError> {
    let len = i32::try_from(raw.len()).map_err(|_| EncodeError::LengthExceedsLimit {
        field: "raw payload",
        len: raw.len(),
        max: i32::MAX as usize,
    })?;
    writer.write_i32(len);
    writer.write_bytes(raw.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_passthrough() {
        let raw = RawPayload(vec![0x00, 0x80, 0xA0, 0x25, 0xFF]);
        let mut writer = Writer::new();
        encode_raw(&mut writer, &raw).unwrap();
        assert_eq!(&writer.as_bytes()[..4], &[5, 0, 0, 0]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_raw(&mut reader).unwrap(), raw);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        let mut reader = Reader::new(&[0, 0, 0, 0]);
        assert!(decode_raw(&mut reader).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_payload() {
        let mut reader = Reader::new(&[8, 0, 0, 0, 1, 2]);
        let result = decode_raw(&mut reader);
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedInput { offset: 4, needed: 8, .. })
        ));
    }
}
