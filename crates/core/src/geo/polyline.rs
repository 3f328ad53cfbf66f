//! Encoded polyline codec.
//!
//! Routes arrive from the dispatch service as encoded polyline strings:
//! coordinates scaled by 1e5, delta-encoded, zigzag-signed, and packed into
//! 5-bit chunks offset by 63 (the printable range `?`..`~`). The encoded
//! order is (lat, lng); decoding swaps to the renderer's (lng, lat) order.
//!
//! Decoding is pure and total: malformed input yields a [`DecodeError`] and
//! the caller treats the route as unavailable.

use crate::errors::DecodeError;
use crate::geo::types::LngLat;

/// Coordinate scale factor (5 decimal places).
const PRECISION: f64 = 1e5;

/// Lowest byte of the chunk alphabet (`?`).
const CHUNK_OFFSET: u8 = 63;

/// Highest byte of the chunk alphabet (`~`).
const CHUNK_MAX: u8 = 126;

/// Chunk flag bit marking that more chunks follow.
const CONTINUATION: i64 = 0x20;

/// Largest shift a well-formed coordinate can reach (6 chunks of 5 bits).
const MAX_SHIFT: u32 = 30;

/// Decode an encoded polyline into (lng, lat) pairs.
///
/// Rejects empty and whitespace-only input with [`DecodeError::Empty`];
/// surrounding whitespace around a valid payload is ignored.
pub fn decode(encoded: &str) -> Result<Vec<LngLat>, DecodeError> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = trimmed.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += read_delta(bytes, &mut index)?;
        lng += read_delta(bytes, &mut index)?;
        points.push(LngLat::new(lng as f64 / PRECISION, lat as f64 / PRECISION));
    }

    Ok(points)
}

/// Encode (lng, lat) pairs into a polyline string. Inverse of [`decode`].
pub fn encode(points: &[LngLat]) -> String {
    let mut output = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        write_delta(lat - prev_lat, &mut output);
        write_delta(lng - prev_lng, &mut output);
        prev_lat = lat;
        prev_lng = lng;
    }

    output
}

/// Read one zigzag-signed delta starting at `*index`, advancing past it.
fn read_delta(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let mut shift: u32 = 0;
    let mut result: i64 = 0;

    loop {
        let byte = match bytes.get(*index) {
            Some(&b) => b,
            None => return Err(DecodeError::Truncated),
        };
        if !(CHUNK_OFFSET..=CHUNK_MAX).contains(&byte) {
            return Err(DecodeError::InvalidCharacter { index: *index });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { index: start });
        }
        *index += 1;

        let chunk = i64::from(byte - CHUNK_OFFSET);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < CONTINUATION {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Append one zigzag-signed delta to `output`.
fn write_delta(value: i64, output: &mut String) {
    let mut v = if value < 0 {
        !(value << 1)
    } else {
        value << 1
    };
    while v >= CONTINUATION {
        output.push((((CONTINUATION | (v & 0x1f)) + i64::from(CHUNK_OFFSET)) as u8) as char);
        v >>= 5;
    }
    output.push(((v + i64::from(CHUNK_OFFSET)) as u8) as char);
}
