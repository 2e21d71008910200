//! Encoded polyline decoding (precision 5), as returned by OSRM with
//! `geometries=polyline`.

use geo::LineString;

use crate::models::types::{Result, TransitError};

const PRECISION: u32 = 5;

/// Longest run of bytes one value may span before it overflows 64 bits
const MAX_VALUE_BYTES: usize = 12;

/// Decode an encoded polyline into a (lon, lat) path.
pub fn decode_polyline(encoded: &str) -> Result<LineString> {
    check_stream(encoded.as_bytes())?;
    polyline::decode_polyline(encoded, PRECISION)
        .map_err(|e| TransitError::InvalidData(format!("Invalid polyline: {}", e)))
}

/// Reject streams the decoder would silently cut short: bytes outside the
/// alphabet, a value left open at the end, or a latitude without longitude.
fn check_stream(bytes: &[u8]) -> Result<()> {
    let mut values = 0;
    let mut run = 0;

    for (index, &byte) in bytes.iter().enumerate() {
        if !(63..=126).contains(&byte) {
            return Err(TransitError::InvalidData(format!(
                "Invalid polyline character {:?} at byte {}",
                byte as char, index
            )));
        }

        run += 1;
        if run > MAX_VALUE_BYTES {
            return Err(TransitError::InvalidData("Polyline value overflow".to_string()));
        }
        // Continuation bit clear: this byte ends a value
        if byte - 63 < 0x20 {
            values += 1;
            run = 0;
        }
    }

    if run != 0 || values % 2 != 0 {
        return Err(TransitError::InvalidData(format!(
            "Truncated polyline after {} values",
            values
        )));
    }
    Ok(())
}
