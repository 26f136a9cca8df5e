use std::ops::Range;

use tracing::debug;

use crate::error::{ReplaceError, Result};
use crate::resolve::{locate, Location};
use crate::segment::Segment;

/// A byte range removed from one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cut {
    index: usize,
    range: Range<usize>,
}

/// Replaces the flat-text range `[start, start + match_len)` with `replacement`.
///
/// The segment containing `start` receives the whole replacement. Each
/// following segment the match reaches loses its matched prefix, which clears
/// it entirely when the match covers all of it. Segments are never removed
/// from the list so their paths stay valid for the writer.
///
/// The cut plan is validated before anything is touched: on error the
/// segments are left unchanged.
pub fn splice(
    segments: &mut [Segment],
    start: usize,
    match_len: usize,
    replacement: &str,
) -> Result<()> {
    let cuts = plan(segments, start, match_len)?;
    debug!(
        "Splicing {} bytes at offset {} across {} segment(s)",
        match_len,
        start,
        cuts.len()
    );

    let mut cuts = cuts.into_iter();
    if let Some(first) = cuts.next() {
        segments[first.index].data.replace_range(first.range, replacement);
    }
    for cut in cuts {
        segments[cut.index].data.replace_range(cut.range, "");
    }
    Ok(())
}

fn plan(segments: &[Segment], start: usize, match_len: usize) -> Result<Vec<Cut>> {
    let Location { index, offset } = locate(segments, start)?;

    let first = &segments[index];
    let end = (offset + match_len).min(first.len());
    check_boundary(first, index, offset)?;
    check_boundary(first, index, end)?;

    let mut cuts = vec![Cut {
        index,
        range: offset..end,
    }];

    let mut remaining = offset + match_len - end;
    let mut next = index + 1;
    while remaining > 0 {
        let segment = segments.get(next).ok_or_else(|| {
            ReplaceError::ContractViolation(format!(
                "match of {} bytes at offset {} runs {} bytes past the end of the text",
                match_len, start, remaining
            ))
        })?;
        let take = remaining.min(segment.len());
        check_boundary(segment, next, take)?;
        cuts.push(Cut {
            index: next,
            range: 0..take,
        });
        remaining -= take;
        next += 1;
    }

    Ok(cuts)
}

fn check_boundary(segment: &Segment, index: usize, at: usize) -> Result<()> {
    if segment.data.is_char_boundary(at) {
        Ok(())
    } else {
        Err(ReplaceError::ContractViolation(format!(
            "byte {} of segment {} ({}) is not a character boundary",
            at, index, segment.path
        )))
    }
}
