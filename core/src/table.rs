//! [`Table`] and the process-local [`Catalog`] of tables built up over the
//! course of a job.

use std::collections::HashMap;

use crate::column::Column;

/// Every table carries this synthetic primary key ahead of its schema
/// columns.
const ID_COLUMN_DEF: &str = "id CHAR(9) NOT NULL DEFAULT ''";

/// A named, ordered sequence of columns, built once by the Schema Parser
/// and immutable thereafter.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Sum of every schema column's byte width. The full physical row
    /// width the Data Parser expects is this plus the 9-byte primary-key
    /// prefix consumed ahead of these columns.
    pub fn row_width(&self) -> u32 {
        self.columns.iter().map(|c| c.byte_length()).sum()
    }

    /// Renders the full `CREATE TABLE ...;` statement, synthetic `id`
    /// column first, one schema column per line, closed by the primary
    /// key constraint.
    pub fn create_table_sql(&self) -> String {
        let mut out = format!("CREATE TABLE {}(\n\t{},\n", self.name, ID_COLUMN_DEF);
        for col in &self.columns {
            out.push_str(&format!("\t{},\n", col.column_def()));
        }
        out.push_str("\tPRIMARY KEY (id)\n);\n");
        out
    }
}

/// Process-local mapping of table name to [`Table`], populated in
/// schema-processing order and read-only during set processing.
pub type Catalog = HashMap<String, Table>;
