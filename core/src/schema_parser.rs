//! Walks an IDMS schema file, extracting the record name and elementary
//! items into a [`Table`], and independently rendering the item lines of
//! a COBOL copybook.

use regex::Regex;

use crate::column::Column;
use crate::name::to_snake;
use crate::table::Table;
use common::err::{CResult, ReError};

fn record_name_re() -> Regex {
    Regex::new(r"RECORD\s+NAME\.*\s+(?P<name>[a-zA-Z\d-]+)").unwrap()
}

/// Matches a fully-formed elementary item: level, name, a throwaway
/// token, an optional quoted default, a PIC token, then two trailing
/// integers. Used to build `CREATE TABLE` columns.
fn elem_item_re() -> Regex {
    Regex::new(
        r"^(?P<lvl>\d{2})\s+(?P<name>[a-zA-Z\d-]+)\s+[a-zA-Z\d-]+\s+'?(?P<def_val>[a-zA-Z\d-]+)?'?\s+(?P<type>[a-zA-Z\d()]+)\s+\d+\s+\d+$",
    )
    .unwrap()
}

/// Looser generic-item shape used for copybook emission: PIC and
/// default are both optional, so condition (88) items and other
/// non-elementary lines are still captured for the copybook body.
fn generic_item_re() -> Regex {
    Regex::new(
        r"^(?P<lvl>\d{2})\s+(?P<name>[a-zA-Z\d-]+)\s+[a-zA-Z\d-]+'?(?:\s+)(?P<def_val>[a-zA-Z\d-]+)?'?(?:\s+)(?P<type>[a-zA-Z\d()]+)?\s+\d+\s+\d+$",
    )
    .unwrap()
}

/// Extracts the raw (not snake-cased) record name from a schema file.
/// Fatal for the caller if absent.
pub fn parse_record_name(file_contents: &str) -> CResult<String> {
    record_name_re()
        .captures(file_contents)
        .map(|c| c["name"].to_string())
        .ok_or_else(|| ReError::RecordNameNotFound("no RECORD NAME line found in schema".to_string()))
}

/// Builds the [`Table`] (id column + elementary items) for a schema whose
/// record name (already snake-cased) is `table_name`.
pub fn build_table(table_name: &str, file_contents: &str) -> CResult<Table> {
    let mut table = Table::new(table_name);
    let re = elem_item_re();

    for line in file_contents.lines() {
        let line = line.trim();
        let Some(caps) = re.captures(line) else {
            continue;
        };

        if &caps["lvl"] == "88" {
            continue;
        }

        let name = &caps["name"];
        if name == "FILLER" {
            continue;
        }

        let col_name = to_snake(name);
        let pic = &caps["type"];
        let default_val = caps.name("def_val").map(|m| m.as_str().to_string());

        let column = Column::new(col_name, pic, default_val)?;
        table.push_column(column);
    }

    Ok(table)
}

/// Renders the per-item lines of a COBOL copybook body (the `01 <name>.`
/// header is written by the caller before this). Preserves original IDMS
/// casing and PIC text verbatim; no name normalization is applied here.
pub fn build_copybook_body(file_contents: &str) -> String {
    let re = generic_item_re();
    let mut out = String::new();

    for line in file_contents.lines() {
        let line = line.trim();
        let Some(caps) = re.captures(line) else {
            continue;
        };

        let level = &caps["lvl"];
        let level_n: usize = level.parse().unwrap_or(0);
        let name = &caps["name"];
        let default_part = caps
            .name("def_val")
            .map(|m| format!(" VALUE {}", m.as_str()))
            .unwrap_or_default();
        let pic_part = caps
            .name("type")
            .map(|m| format!(" PIC {}", m.as_str()))
            .unwrap_or_default();

        out.push_str(&" ".repeat(7));
        out.push_str(&"\t".repeat(level_n));
        out.push_str(&format!("{} {}{}{}.\n", level, name, pic_part, default_part));
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    const SCHEMA: &str = "RECORD NAME.... CUSTOMER-RECORD\n05  CUST-ID    PIC  'SPACE'  X(9)      1   9\n";

    #[test]
    fn test_parse_record_name() {
        assert_eq!(parse_record_name(SCHEMA).unwrap(), "CUSTOMER-RECORD");
    }

    #[test]
    fn test_parse_record_name_missing() {
        assert!(parse_record_name("no such line here").is_err());
    }

    #[test]
    fn test_build_table_skips_filler_and_condition() {
        let content = "05  CUST-ID    PIC  'SPACE'  X(9)      1   9\n\
                        88  IS-ACTIVE  PIC  'SPACE'  X(1)      10  10\n\
                        05  FILLER     PIC  'SPACE'  X(2)      11  12\n";
        let table = build_table("customer_record", content).unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "cust_id");
    }

    #[test]
    fn test_build_copybook_body_includes_filler_and_conditions() {
        let content = "05  CUST-ID    PIC  'SPACE'  X(9)      1   9\n\
                        05  FILLER     PIC  'SPACE'  X(2)      11  12\n";
        let body = build_copybook_body(content);
        assert!(body.contains("CUST-ID"));
        assert!(body.contains("FILLER"));
    }
}
