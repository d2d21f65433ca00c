//! Versioned compression layer for trace blobs
//!
//! Every stored blob carries a compression code chosen when the blob was
//! written; decoding dispatches on that stored code and never on a "current"
//! default, so historical data stays readable across algorithm upgrades. New
//! algorithms are added as new codes; old codes remain decodable forever.
//!
//! The compressed bytes carry no embedded header. The code and the
//! uncompressed length travel out-of-band with the owning record, and the
//! decompressor treats any deviation from the expected length as a hard
//! integrity failure.

use crate::codec::error::{CodecError, CodecResult};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compression generation stored alongside each blob.
///
/// The numeric values are persisted and must never be renumbered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum CompressionCode {
    /// Raw pass-through
    None = 0,
    /// DEFLATE: the older general-purpose generation
    Deflate = 1,
    /// LZ4: the current default, faster with a computable worst-case bound
    #[default]
    Lz4 = 2,
}

impl CompressionCode {
    /// The stored integer code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for CompressionCode {
    type Error = CodecError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CompressionCode::None),
            1 => Ok(CompressionCode::Deflate),
            2 => Ok(CompressionCode::Lz4),
            _ => Err(CodecError::UnknownCompressionCode(value)),
        }
    }
}

impl std::fmt::Display for CompressionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionCode::None => write!(f, "none"),
            CompressionCode::Deflate => write!(f, "deflate"),
            CompressionCode::Lz4 => write!(f, "lz4"),
        }
    }
}

/// Upper bound on the DEFLATE output size: ceil(1.05 * len) + 16.
///
/// DEFLATE's worst-case expansion on incompressible input (full-precision
/// floating point data is the known case) is a handful of bytes per 16 KiB
/// block plus stream framing, well inside this bound.
fn deflate_bound(len: usize) -> usize {
    len + (len + 19) / 20 + 16
}

/// Compress a raw buffer under the given generation code.
///
/// Real algorithms allocate at the worst-case bound, compress, then shrink
/// the buffer to the reported actual length. `None` passes the bytes through
/// unchanged, and an empty input compresses to an empty output for every
/// code.
pub fn compress(raw: &[u8], code: CompressionCode) -> CodecResult<Vec<u8>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let compressed = match code {
        CompressionCode::None => raw.to_vec(),
        CompressionCode::Deflate => deflate_compress(raw)?,
        CompressionCode::Lz4 => lz4_compress(raw)?,
    };

    debug!(
        code = %code,
        raw_len = raw.len(),
        compressed_len = compressed.len(),
        "compressed blob"
    );
    Ok(compressed)
}

/// Decompress a buffer whose uncompressed length is known out-of-band.
///
/// The output buffer is allocated at exactly `expected_len`; if the
/// algorithm's actual decompressed length differs, the call fails rather than
/// silently truncating or padding.
pub fn decompress(
    compressed: &[u8],
    expected_len: usize,
    code: CompressionCode,
) -> CodecResult<Vec<u8>> {
    if compressed.is_empty() && expected_len == 0 {
        return Ok(Vec::new());
    }

    match code {
        CompressionCode::None => {
            if compressed.len() != expected_len {
                return Err(CodecError::Compression(format!(
                    "stored blob length {} does not match expected length {}",
                    compressed.len(),
                    expected_len
                )));
            }
            Ok(compressed.to_vec())
        }
        CompressionCode::Deflate => deflate_decompress(compressed, expected_len),
        CompressionCode::Lz4 => lz4_decompress(compressed, expected_len),
    }
}

fn lz4_compress(raw: &[u8]) -> CodecResult<Vec<u8>> {
    let mut output = vec![0u8; lz4_flex::block::get_maximum_output_size(raw.len())];
    let written = lz4_flex::block::compress_into(raw, &mut output)
        .map_err(|e| CodecError::Compression(format!("lz4 compression failed: {}", e)))?;
    output.truncate(written);
    Ok(output)
}

fn lz4_decompress(compressed: &[u8], expected_len: usize) -> CodecResult<Vec<u8>> {
    let mut output = vec![0u8; expected_len];
    let written = lz4_flex::block::decompress_into(compressed, &mut output)
        .map_err(|e| CodecError::Compression(format!("lz4 decompression failed: {}", e)))?;
    if written != expected_len {
        return Err(CodecError::Compression(format!(
            "lz4 decompressed length {} does not match expected length {}",
            written, expected_len
        )));
    }
    Ok(output)
}

fn deflate_compress(raw: &[u8]) -> CodecResult<Vec<u8>> {
    let mut output = Vec::with_capacity(deflate_bound(raw.len()));
    let mut encoder = Compress::new(Compression::default(), true);
    let status = encoder
        .compress_vec(raw, &mut output, FlushCompress::Finish)
        .map_err(|e| CodecError::Compression(format!("deflate compression failed: {}", e)))?;
    if !matches!(status, Status::StreamEnd) {
        return Err(CodecError::Compression(
            "deflate output exceeded its allocated bound".to_string(),
        ));
    }
    Ok(output)
}

fn deflate_decompress(compressed: &[u8], expected_len: usize) -> CodecResult<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_len);
    let mut decoder = Decompress::new(true);
    let status = decoder
        .decompress_vec(compressed, &mut output, FlushDecompress::Finish)
        .map_err(|e| CodecError::Compression(format!("deflate decompression failed: {}", e)))?;
    if !matches!(status, Status::StreamEnd) || output.len() != expected_len {
        return Err(CodecError::Compression(format!(
            "deflate decompressed length {} does not match expected length {}",
            output.len(),
            expected_len
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: [CompressionCode; 3] = [
        CompressionCode::None,
        CompressionCode::Deflate,
        CompressionCode::Lz4,
    ];

    fn sample_bytes(len: usize) -> Vec<u8> {
        // repetitive enough to compress, varied enough to be interesting
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_roundtrip_all_codes() {
        let raw = sample_bytes(4096);

        for code in ALL_CODES {
            let compressed = compress(&raw, code).unwrap();
            let restored = decompress(&compressed, raw.len(), code).unwrap();
            assert_eq!(restored, raw, "code {:?}", code);
        }
    }

    #[test]
    fn test_empty_input_roundtrip() {
        for code in ALL_CODES {
            let compressed = compress(&[], code).unwrap();
            assert!(compressed.is_empty());
            let restored = decompress(&compressed, 0, code).unwrap();
            assert!(restored.is_empty());
        }
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let raw = sample_bytes(1024);

        for code in ALL_CODES {
            let compressed = compress(&raw, code).unwrap();
            // declare the wrong uncompressed length, both directions
            assert!(matches!(
                decompress(&compressed, raw.len() - 1, code),
                Err(CodecError::Compression(_))
            ));
            assert!(matches!(
                decompress(&compressed, raw.len() + 1, code),
                Err(CodecError::Compression(_))
            ));
        }
    }

    #[test]
    fn test_incompressible_input_stays_within_bound() {
        // a pseudo-random buffer that will not compress
        let mut state = 0x12345678u32;
        let raw: Vec<u8> = (0..8192)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 24) as u8
            })
            .collect();

        let deflated = compress(&raw, CompressionCode::Deflate).unwrap();
        assert!(deflated.len() <= deflate_bound(raw.len()));
        assert_eq!(
            decompress(&deflated, raw.len(), CompressionCode::Deflate).unwrap(),
            raw
        );

        let lz4 = compress(&raw, CompressionCode::Lz4).unwrap();
        assert_eq!(decompress(&lz4, raw.len(), CompressionCode::Lz4).unwrap(), raw);
    }

    #[test]
    fn test_code_roundtrip() {
        for code in ALL_CODES {
            assert_eq!(CompressionCode::try_from(code.code()).unwrap(), code);
        }
        assert!(matches!(
            CompressionCode::try_from(7),
            Err(CodecError::UnknownCompressionCode(7))
        ));
        assert_eq!(CompressionCode::default(), CompressionCode::Lz4);
    }

    #[test]
    fn test_compression_actually_shrinks_repetitive_data() {
        let raw = vec![42u8; 64 * 1024];
        for code in [CompressionCode::Deflate, CompressionCode::Lz4] {
            let compressed = compress(&raw, code).unwrap();
            assert!(
                compressed.len() < raw.len() / 4,
                "code {:?} produced {} bytes",
                code,
                compressed.len()
            );
        }
    }
}
