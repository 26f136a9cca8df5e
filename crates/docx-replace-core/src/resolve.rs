use crate::error::{ReplaceError, Result};
use crate::segment::Segment;

/// Position of a flat-text offset inside the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index of the segment containing the offset.
    pub index: usize,
    /// Byte offset inside that segment's data.
    pub offset: usize,
}

/// Maps a flat-text byte offset to the segment whose range `[before, before + len)` contains it.
///
/// An offset on a segment boundary resolves to the following segment at
/// offset 0. Offsets at or past the end of the flat text are rejected.
pub fn locate(segments: &[Segment], start: usize) -> Result<Location> {
    let mut before = 0usize;
    for (index, segment) in segments.iter().enumerate() {
        let end = before + segment.len();
        if start < end {
            return Ok(Location {
                index,
                offset: start - before,
            });
        }
        before = end;
    }

    Err(ReplaceError::ContractViolation(format!(
        "offset {} is outside the flattened text of {} bytes",
        start, before
    )))
}
