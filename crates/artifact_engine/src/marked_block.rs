//! Marked-region text splice.
//!
//! A marked block is a region of a user-owned file delimited by a start and
//! an end sentinel line. Only that region is generated; everything outside
//! it belongs to the user and is preserved byte for byte.
//!
//! The splice is a pure function over text so it can be reasoned about and
//! tested without touching the filesystem.

use crate::ArtifactOutcome;
use std::ops::Range;

#[cfg(test)]
#[path = "marked_block_tests.rs"]
mod tests;

/// Byte range of the first marked region in `content`.
///
/// The region runs from the first occurrence of `start` to the end of the
/// first occurrence of `end` after it, both sentinels included.
pub fn find_region(content: &str, start: &str, end: &str) -> Option<Range<usize>> {
    let start_idx = content.find(start)?;
    let search_from = start_idx + start.len();
    let end_rel = content[search_from..].find(end)?;
    Some(start_idx..search_from + end_rel + end.len())
}

/// Normalises a block so it ends with exactly one newline.
pub fn normalize_block(block: &str) -> String {
    let mut text = block.trim_matches('\n').to_string();
    text.push('\n');
    text
}

/// Inserts or replaces the marked block.
///
/// - No existing content: the result is the block alone (`Created`).
/// - Both sentinels present: the region is replaced in place (`Updated`, or
///   `Unchanged` when the text is identical).
/// - Sentinels missing: the block is appended, separated by a newline when
///   the existing text does not end in one (`Updated`).
pub fn upsert(
    existing: Option<&str>,
    start: &str,
    end: &str,
    block: &str,
) -> (String, ArtifactOutcome) {
    let block_text = normalize_block(block);

    let Some(content) = existing else {
        return (block_text, ArtifactOutcome::Created);
    };

    match find_region(content, start, end) {
        Some(region) => {
            let mut updated = String::with_capacity(content.len() + block_text.len());
            updated.push_str(&content[..region.start]);
            updated.push_str(block_text.trim_end_matches('\n'));
            updated.push_str(&content[region.end..]);

            if updated == content {
                (updated, ArtifactOutcome::Unchanged)
            } else {
                (updated, ArtifactOutcome::Updated)
            }
        }
        None => {
            let mut updated = content.to_string();
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&block_text);
            (updated, ArtifactOutcome::Updated)
        }
    }
}
