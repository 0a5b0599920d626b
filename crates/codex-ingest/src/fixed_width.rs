//! Fixed-position sources such as the ICD-10-CM order file.

use std::path::Path;

use codex_model::{FixedField, RawRecord, RawTable};

use crate::error::{IngestError, Result};
use crate::options::MalformedPolicy;

/// Slice each line into the configured fields.
///
/// Offsets count characters, not bytes. Field names become the table header;
/// with `skip_first_line` the first non-blank line is treated as a title row
/// and dropped. A line that ends before the last field begins is malformed.
pub(crate) fn read_fixed_width(
    text: &str,
    path: &Path,
    fields: &[FixedField],
    skip_first_line: bool,
    policy: MalformedPolicy,
) -> Result<RawTable> {
    let headers = fields.iter().map(|field| field.name.clone()).collect();
    let mut table = RawTable::new(Some(headers));
    let required = fields.iter().map(|field| field.start + 1).max().unwrap_or(0);
    let mut title_pending = skip_first_line;
    let mut saw_content = false;

    for (index, line) in text.lines().enumerate() {
        let line_number = index as u64 + 1;
        if line.trim().is_empty() {
            continue;
        }
        saw_content = true;
        if title_pending {
            title_pending = false;
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        if chars.len() < required {
            policy.handle(
                &mut table,
                IngestError::MalformedLine {
                    path: path.to_path_buf(),
                    line: line_number,
                    reason: format!(
                        "line has {} characters, layout needs at least {required}",
                        chars.len()
                    ),
                },
            )?;
            continue;
        }
        let values = fields
            .iter()
            .map(|field| slice(&chars, field))
            .collect();
        table.push(RawRecord::new(line_number, values));
    }

    if !saw_content {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(table)
}

fn slice(chars: &[char], field: &FixedField) -> String {
    let start = field.start.min(chars.len());
    let end = field.end.unwrap_or(chars.len()).min(chars.len()).max(start);
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_layout() -> Vec<FixedField> {
        vec![
            FixedField::new("order_number", 0, Some(5)),
            FixedField::new("code", 6, Some(13)),
            FixedField::new("header_flag", 14, Some(15)),
            FixedField::new("short_description", 16, Some(76)),
            FixedField::new("long_description", 77, None),
        ]
    }

    fn order_line(order: &str, code: &str, flag: &str, short: &str, long: &str) -> String {
        format!("{order:<5} {code:<7} {flag} {short:<60} {long}")
    }

    #[test]
    fn slices_order_file() {
        let text = format!(
            "{}\n{}\n",
            order_line("00001", "A00", "0", "Cholera", "Cholera"),
            order_line(
                "00002",
                "A000",
                "1",
                "Cholera due to Vibrio cholerae 01, biovar cholerae",
                "Cholera due to Vibrio cholerae 01, biovar cholerae"
            ),
        );
        let table = read_fixed_width(
            &text,
            Path::new("order.txt"),
            &order_layout(),
            false,
            MalformedPolicy::Fail,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.header_index("code"), Some(1));
        assert_eq!(table.records[1].get(1).map(str::trim), Some("A000"));
        assert_eq!(
            table.records[1].get(4),
            Some("Cholera due to Vibrio cholerae 01, biovar cholerae")
        );
    }

    #[test]
    fn offsets_count_characters() {
        let fields = vec![FixedField::new("code", 0, Some(3)), FixedField::new("term", 4, None)];
        let table = read_fixed_width(
            "É01 Érysipèle\n",
            Path::new("x"),
            &fields,
            false,
            MalformedPolicy::Fail,
        )
        .unwrap();
        assert_eq!(table.records[0].get(0), Some("É01"));
        assert_eq!(table.records[0].get(1), Some("Érysipèle"));
    }

    #[test]
    fn short_line_is_malformed() {
        let text = format!("{}\nshort\n", order_line("00001", "A00", "0", "Cholera", "Cholera"));
        let err = read_fixed_width(
            &text,
            Path::new("order.txt"),
            &order_layout(),
            false,
            MalformedPolicy::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MalformedLine { line: 2, .. }));

        let table = read_fixed_width(
            &text,
            Path::new("order.txt"),
            &order_layout(),
            false,
            MalformedPolicy::Skip,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.malformed_skipped, 1);
    }

    #[test]
    fn title_row_is_dropped() {
        let fields = vec![FixedField::new("code", 0, Some(5)), FixedField::new("term", 6, None)];
        let table = read_fixed_width(
            "CODE  TERM\nA0021 Ambulance\n",
            Path::new("x"),
            &fields,
            true,
            MalformedPolicy::Fail,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].get(0), Some("A0021"));
    }

    #[test]
    fn blank_source_is_empty() {
        let fields = vec![FixedField::new("code", 0, None)];
        let err = read_fixed_width("\n \n", Path::new("x"), &fields, false, MalformedPolicy::Fail)
            .unwrap_err();
        assert!(matches!(err, IngestError::EmptySource { .. }));
    }
}
