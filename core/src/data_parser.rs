//! Parses a fixed-width IDMS data file against a [`Table`] layout and
//! renders one `INSERT` statement covering every surviving row.
//!
//! Slicing is always byte-oriented: IDMS unload files are positional at
//! the byte level, regardless of the configured `encoding`, which only
//! governs how a sliced byte range is turned into a `String` for CHAR
//! columns.

use encoding_rs::Encoding;
use tracing::warn;

use crate::pic::ColumnType;
use crate::table::Table;

const UNLOAD_PREFIX: &[u8] = b"UNLOAD ";
const PRIMARY_KEY_LEN: usize = 9;

fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (cow, _, _) = encoding.decode(bytes);
    cow.into_owned()
}

/// Renders one field's SQL literal per the type-aware transforms.
fn render_field(col_type: &ColumnType, raw: &[u8], encoding: &'static Encoding) -> String {
    match col_type {
        ColumnType::Numeric { .. } | ColumnType::BigInt { .. } => {
            let text = decode(raw, encoding);
            if text.trim().is_empty() {
                return "NULL".to_string();
            }
            let stripped = text.trim_start_matches('0');
            if stripped.is_empty() {
                "0".to_string()
            } else {
                stripped.to_string()
            }
        }
        ColumnType::Decimal { len_1, .. } => {
            let split = (*len_1 as usize).min(raw.len());
            let (left_raw, right_raw) = raw.split_at(split);
            let left_text = decode(left_raw, encoding);
            let right_text = decode(right_raw, encoding);

            let left = left_text.trim_start_matches('0');
            let left = if left.is_empty() { "0" } else { left };
            let right = right_text.trim_end_matches('0');
            let right = if right.is_empty() { "0" } else { right };
            format!("{}.{}", left, right)
        }
        ColumnType::Char { .. } => {
            let text = decode(raw, encoding);
            if text.trim().is_empty() {
                "''".to_string()
            } else {
                format!("'{}'", text.replace('\'', "\\'"))
            }
        }
    }
}

/// Parses one positional data line into the `(v1, v2, ...)` tuple used in
/// a MySQL `VALUES` list: the synthetic `id` value first (the line's own
/// primary-key prefix, rendered as CHAR), then the schema columns sliced
/// in order from the bytes following it.
pub fn parse_row(line: &[u8], table: &Table, encoding: &'static Encoding) -> String {
    let pk_len = PRIMARY_KEY_LEN.min(line.len());
    let (pk_raw, mut remaining) = line.split_at(pk_len);

    let mut vals = Vec::with_capacity(table.columns.len() + 1);
    vals.push(render_field(&ColumnType::Char { len: PRIMARY_KEY_LEN as u32 }, pk_raw, encoding));

    for col in &table.columns {
        let len = (col.byte_length() as usize).min(remaining.len());
        let (raw, rest) = remaining.split_at(len);
        vals.push(render_field(&col.col_type, raw, encoding));
        remaining = rest;
    }

    format!("({})", vals.join(", "))
}

/// Parses an entire data file's bytes into an `INSERT` statement for
/// `table`, or `None` if every line was skipped (UNLOAD marker or
/// duplicate primary key) leaving no rows to insert.
pub fn build_insert(file_bytes: &[u8], table: &Table, encoding: &'static Encoding) -> Option<String> {
    let text = decode(file_bytes, encoding);
    let mut rows = Vec::new();
    let mut last_primary_key: Option<Vec<u8>> = None;

    for line in text.lines() {
        let line_bytes = line.as_bytes();
        if line_bytes.starts_with(UNLOAD_PREFIX) {
            continue;
        }

        let pk_len = PRIMARY_KEY_LEN.min(line_bytes.len());
        let primary_key = line_bytes[..pk_len].to_vec();

        if last_primary_key.as_deref() == Some(primary_key.as_slice()) {
            warn!(table = %table.name, "duplicate primary key, skipping row");
            continue;
        }
        last_primary_key = Some(primary_key);

        rows.push(parse_row(line_bytes, table, encoding));
    }

    if rows.is_empty() {
        return None;
    }

    let columns = std::iter::once("\tid".to_string())
        .chain(table.columns.iter().map(|c| format!("\t{}", c.name)))
        .collect::<Vec<_>>()
        .join(",\n");

    Some(format!(
        "\nINSERT INTO {}(\n{}\n) VALUES\n{};\n",
        table.name,
        columns,
        rows.join(",\n")
    ))
}
