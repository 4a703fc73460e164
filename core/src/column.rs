//! A single ordered attribute of a [`crate::table::Table`].

use crate::pic::{parse_pic, ColumnType};
use common::err::CResult;

/// A column as it will be rendered into `CREATE TABLE`/`INSERT` and used
/// to slice positional data rows.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub col_type: ColumnType,
    pub default_literal: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, pic: &str, default_literal: Option<String>) -> CResult<Self> {
        let col_type = parse_pic(pic)?;
        Ok(Column {
            name: name.into(),
            col_type,
            default_literal,
        })
    }

    /// Total byte width this column occupies in a positional data row.
    pub fn byte_length(&self) -> u32 {
        self.col_type.length()
    }

    /// `length_1` for DECIMAL columns, `None` otherwise.
    pub fn length_1(&self) -> Option<u32> {
        match self.col_type {
            ColumnType::Decimal { len_1, .. } => Some(len_1),
            _ => None,
        }
    }

    /// `length_2` for DECIMAL columns, `None` otherwise.
    pub fn length_2(&self) -> Option<u32> {
        match self.col_type {
            ColumnType::Decimal { len_2, .. } => Some(len_2),
            _ => None,
        }
    }

    /// Renders the `<col_name> <sql_type>[(len)] [ DEFAULT ...]` fragment
    /// used inside a `CREATE TABLE` statement. A space always separates
    /// the type from the default clause, even when there is none —
    /// matching the source renderer, which leaves a trailing space
    /// before columns with no default.
    pub fn column_def(&self) -> String {
        let default = crate::pic::default_clause(self.default_literal.as_deref());
        format!(
            "{} {}{} {}",
            self.name,
            self.col_type.mysql_type(),
            self.col_type.var_len_str(),
            default
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_column_def_char() {
        let c = Column::new("cust_id", "X(9)", None).unwrap();
        assert_eq!(c.column_def(), "cust_id CHAR(9) ");
        assert_eq!(c.byte_length(), 9);
    }

    #[test]
    fn test_column_def_decimal_with_default() {
        let c = Column::new("balance", "S9(5)V99", Some("ZERO".to_string())).unwrap();
        assert_eq!(c.column_def(), "balance DECIMAL(5,2)  DEFAULT 0");
        assert_eq!(c.byte_length(), 7);
        assert_eq!(c.length_1(), Some(5));
        assert_eq!(c.length_2(), Some(2));
    }

    #[test]
    fn test_column_def_numeric_no_len_suffix() {
        let c = Column::new("age", "9(3)", None).unwrap();
        assert_eq!(c.column_def(), "age NUMERIC ");
    }
}
