//! Parses COBOL/IDMS PIC clauses into a resolved column type, length and
//! SQL/copybook rendering helpers.
//!
//! Resolution order mirrors the mainframe copybook grammar: a PIC clause
//! is tried against each pattern in turn and the first match wins.

use common::err::{CResult, ReError};
use regex::Regex;

/// Resolved shape of an elementary PIC item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// `X(n)` / `A(n)` — fixed-width character data.
    Char { len: u32 },
    /// `9(n)` unsigned whole number.
    Numeric { len: u32 },
    /// `S9(n)` signed whole number.
    BigInt { len: u32 },
    /// `S9(a)V9(b)` / `S9(a)V(b)9s` — fixed-point decimal, `len_1` digits
    /// before the implied decimal point and `len_2` after.
    Decimal { len_1: u32, len_2: u32 },
}

impl ColumnType {
    /// Total byte width on the positional data file.
    pub fn length(&self) -> u32 {
        match self {
            ColumnType::Char { len } => *len,
            ColumnType::Numeric { len } => *len,
            ColumnType::BigInt { len } => *len,
            ColumnType::Decimal { len_1, len_2 } => len_1 + len_2,
        }
    }

    /// The MySQL column type keyword.
    pub fn mysql_type(&self) -> &'static str {
        match self {
            ColumnType::Char { .. } => "CHAR",
            ColumnType::Numeric { .. } => "NUMERIC",
            ColumnType::BigInt { .. } => "BIGINT",
            ColumnType::Decimal { .. } => "DECIMAL",
        }
    }

    /// The `(n)` / `(n,m)` suffix appended to the MySQL type name.
    /// NUMERIC columns carry no length suffix, matching the original
    /// column-definition renderer.
    pub fn var_len_str(&self) -> String {
        match self {
            ColumnType::Char { len } => format!("({})", len),
            ColumnType::Numeric { .. } => String::new(),
            ColumnType::BigInt { len } => format!("({})", len),
            ColumnType::Decimal { len_1, len_2 } => format!("({},{})", len_1, len_2),
        }
    }
}

struct PicPatterns {
    std: Regex,
    signed_int: Regex,
    decimal: Regex,
    decimal_trailing_nines: Regex,
}

fn patterns() -> PicPatterns {
    PicPatterns {
        std: Regex::new(r"^(?P<type>[AX9])\((?P<len>\d+)\)$").unwrap(),
        signed_int: Regex::new(r"^S9\((?P<len>\d+)\)$").unwrap(),
        decimal: Regex::new(r"^S?9\((?P<len_1>\d+)\)V9\((?P<len_2>\d+)\)$").unwrap(),
        decimal_trailing_nines: Regex::new(r"^S?9\((?P<len_1>\d+)\)V(?P<len_2>9+)$").unwrap(),
    }
}

/// Parses a PIC clause, e.g. `X(10)`, `S9(5)`, `S9(7)V9(2)`, `9(4)V99`.
///
/// Falls back to treating the clause literally as a one-character-per-byte
/// field when no pattern matches, with `len` equal to the clause's own
/// character length — this mirrors the original parser's defensive
/// fallback for PIC clauses it doesn't otherwise recognize.
pub fn parse_pic(pic: &str) -> CResult<ColumnType> {
    let pic = pic.trim();
    let p = patterns();

    if let Some(caps) = p.std.captures(pic) {
        let len: u32 = caps["len"].parse().map_err(|_| ReError::PicParseErr(pic.to_string()))?;
        let ty = &caps["type"];
        return Ok(match ty {
            "9" => ColumnType::Numeric { len },
            _ => ColumnType::Char { len },
        });
    }

    if let Some(caps) = p.signed_int.captures(pic) {
        let len: u32 = caps["len"].parse().map_err(|_| ReError::PicParseErr(pic.to_string()))?;
        return Ok(ColumnType::BigInt { len });
    }

    if let Some(caps) = p.decimal.captures(pic) {
        let len_1: u32 = caps["len_1"].parse().map_err(|_| ReError::PicParseErr(pic.to_string()))?;
        let len_2: u32 = caps["len_2"].parse().map_err(|_| ReError::PicParseErr(pic.to_string()))?;
        return Ok(ColumnType::Decimal { len_1, len_2 });
    }

    if let Some(caps) = p.decimal_trailing_nines.captures(pic) {
        let len_1: u32 = caps["len_1"].parse().map_err(|_| ReError::PicParseErr(pic.to_string()))?;
        let len_2 = caps["len_2"].len() as u32;
        return Ok(ColumnType::Decimal { len_1, len_2 });
    }

    // Fallback: map the first character of the clause to a type and use
    // the clause's own length as the field width.
    let first = pic.chars().next().ok_or_else(|| ReError::PicParseErr(pic.to_string()))?;
    let len = pic.chars().count() as u32;
    Ok(match first {
        '9' => ColumnType::Numeric { len },
        _ => ColumnType::Char { len },
    })
}

/// Renders the ` DEFAULT ...` clause for a CREATE TABLE column
/// definition, given the raw default-value literal from the copybook
/// (if any).
pub fn default_clause(def_val: Option<&str>) -> String {
    match def_val {
        None => String::new(),
        Some(v) if v.starts_with("SPACE") => " DEFAULT ''".to_string(),
        Some(v) if v.starts_with("ZERO") => " DEFAULT 0".to_string(),
        Some(v) => format!(" DEFAULT {}", v),
    }
}
