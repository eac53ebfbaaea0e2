//! The air scan dump codec.
//!
//! Serialized layout, little-endian, no padding:
//!
//! - `[4 bytes]` signature, `0xDEADC0DE`
//! - `[4 bytes]` sampling rate, microseconds, signed
//! - `[n bytes]` sample data, one byte each, 0 = low / 1 = high
//!
//! The format is self-validating: the signature, the sampling rate, every
//! sample byte and the sample count are all checked on decode.

/// Signature identifying dump files.
pub const DUMP_SIGNATURE: u32 = 0xDEAD_C0DE;

/// Signature plus sampling rate.
const HEADER_LEN: usize = 8;

/// Ways a dump file can fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DumpError {
    /// The file does not start with the dump signature.
    #[error("given file is not an air scan dump (signature mismatch)")]
    SignatureMismatch,

    /// The header is truncated or carries a non-positive sampling rate.
    #[error("air scan dump seems corrupted ({0})")]
    CorruptHeader(String),

    /// A sample byte is neither 0 nor 1.
    #[error("air scan dump seems corrupted (invalid data value {0})")]
    CorruptSample(u8),

    /// The dump contains no samples.
    #[error("air scan dump seems corrupted (no data elements found)")]
    EmptyData,

    /// The decoded sample count disagrees with the file length.
    #[error("air scan dump seems corrupted (expected {expected} data elements, read {actual})")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A decoded air scan dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    /// Delay between two samples, in microseconds. Always positive.
    pub sampling_rate_us: i32,

    /// The recorded levels, true = high.
    pub samples: Vec<bool>,
}

/// Serialize a sample buffer and its sampling rate.
pub fn encode(sampling_rate_us: i32, samples: &[bool]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len());

    bytes.extend_from_slice(&DUMP_SIGNATURE.to_le_bytes());
    bytes.extend_from_slice(&sampling_rate_us.to_le_bytes());
    bytes.extend(samples.iter().map(|&high| high as u8));

    bytes
}

/// Deserialize a dump, validating signature, header and every sample.
pub fn decode(bytes: &[u8]) -> Result<Dump, DumpError> {
    if bytes.len() < 4 {
        return Err(DumpError::SignatureMismatch);
    }
    let signature = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if signature != DUMP_SIGNATURE {
        return Err(DumpError::SignatureMismatch);
    }

    if bytes.len() < HEADER_LEN {
        return Err(DumpError::CorruptHeader("truncated header".to_owned()));
    }
    let sampling_rate_us = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if sampling_rate_us <= 0 {
        return Err(DumpError::CorruptHeader(format!(
            "invalid sampling rate {}",
            sampling_rate_us
        )));
    }

    let mut samples = Vec::with_capacity(bytes.len() - HEADER_LEN);
    for &byte in &bytes[HEADER_LEN..] {
        match byte {
            0 => samples.push(false),
            1 => samples.push(true),
            other => return Err(DumpError::CorruptSample(other)),
        }
    }

    if samples.is_empty() {
        return Err(DumpError::EmptyData);
    }

    let expected = bytes.len() - HEADER_LEN;
    if samples.len() != expected {
        return Err(DumpError::SizeMismatch {
            expected,
            actual: samples.len(),
        });
    }

    Ok(Dump {
        sampling_rate_us,
        samples,
    })
}
