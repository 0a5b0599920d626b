//! Separator detection for `auto` sources.

use codex_model::FieldSeparator;

/// Pick the separator occurring most often on the first non-blank line.
///
/// Ties go to the earlier entry of [`FieldSeparator::candidates`]; a line
/// with no candidate at all is read as comma-separated.
pub fn sniff_separator(text: &str) -> FieldSeparator {
    let Some(line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return FieldSeparator::Comma;
    };
    let mut best = FieldSeparator::Comma;
    let mut best_count = 0usize;
    for candidate in FieldSeparator::candidates() {
        let Some(byte) = candidate.byte() else {
            continue;
        };
        let count = line.bytes().filter(|b| *b == byte).count();
        if count > best_count {
            best = *candidate;
            best_count = count;
        }
    }
    best
}
