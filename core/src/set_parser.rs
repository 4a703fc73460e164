//! Parses an IDMS SET definition and dispatches on its mode: CHAIN sets
//! become `ALTER TABLE ... ADD FOREIGN KEY` statements, INDEX sets become
//! a `CREATE VIEW`.

use regex::Regex;
use tracing::{debug, error, warn};

use crate::name::to_snake;
use crate::table::Catalog;
use common::err::{CResult, ReError};

fn set_header_re() -> Regex {
    Regex::new(r"SET\.+\s+(?P<name>[a-zA-Z\d-]+)\s+MODE\s+(?P<mode>CHAIN|INDEX)").unwrap()
}

fn set_owner_re() -> Regex {
    Regex::new(r"OWNER\.+\s+(?P<name>[a-zA-Z\d-]+)").unwrap()
}

fn set_member_re() -> Regex {
    Regex::new(
        r"MEMBER\.+\s+(?P<table>[a-zA-Z\d-]+)\s+.+\n.+SORT\s+KEY\s+(?P<key>[a-zA-Z\d-]+)\s+(?P<order>ASC|DESC)",
    )
    .unwrap()
}

fn set_member_key_re() -> Regex {
    Regex::new(r"(?P<key>[a-zA-Z\d-]+)\s+(?P<order>ASC|DESC)").unwrap()
}

/// Mode resolved from a SET header, driving the rest of the dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    Chain,
    Index,
}

/// The header line's resolved name and mode.
pub struct SetHeader {
    pub name: String,
    pub mode: SetMode,
}

/// Locates and parses `SET... <name> MODE <CHAIN|INDEX>`. Absence is
/// fatal to the caller for this set file.
pub fn parse_header(file_contents: &str) -> CResult<SetHeader> {
    let caps = set_header_re()
        .captures(file_contents)
        .ok_or_else(|| ReError::SetHeaderNotFound("no SET...MODE header found".to_string()))?;

    let name = caps["name"].to_string();
    let mode = match &caps["mode"] {
        "CHAIN" => SetMode::Chain,
        "INDEX" => SetMode::Index,
        other => return Err(ReError::UnknownSetMode(other.to_string())),
    };

    Ok(SetHeader { name, mode })
}

/// Emits `ALTER TABLE ... ADD FOREIGN KEY` statements for a CHAIN set.
/// Returns an empty string (and logs at debug) when `migrate_fks` is
/// disabled, when no owner is found, or when the owner doesn't resolve
/// to a known table.
pub fn migrate_chain_set(set_name: &str, file_contents: &str, catalog: &Catalog, migrate_fks: bool) -> String {
    if !migrate_fks {
        debug!(set = set_name, "skipped foreign key creation from IDMS chain set");
        return String::new();
    }

    let Some(owner_caps) = set_owner_re().captures(file_contents) else {
        error!(set = set_name, "no owner found for IDMS set");
        return String::new();
    };
    let owner_name = to_snake(&owner_caps["name"]);

    if !catalog.contains_key(&owner_name) {
        warn!(owner = %owner_name, "foreign key referencing owner skipped, no matching table found");
        return String::new();
    }

    let mut out = String::new();
    for member in set_member_re().captures_iter(file_contents) {
        let table_name = to_snake(&member["table"]);
        if !catalog.contains_key(&table_name) {
            warn!(table = %table_name, "foreign key referencing member skipped, no matching table found");
            continue;
        }

        let key = to_snake(&member["key"]);
        let referenced_key = rewrite_key_prefix(&key, &owner_name);
        out.push_str(&format!(
            "\nALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {}({});\n",
            table_name, key, owner_name, referenced_key
        ));
    }

    out
}

/// Rewrites `key`'s first 4 characters to `owner_name`'s first 4
/// characters, reflecting the IDMS convention that related tables share
/// a name prefix in their key columns. When `owner_name` names a column
/// whose prefix genuinely doesn't match the key's, the emitted
/// `REFERENCES` clause can point at a nonexistent column — this mirrors
/// source behavior rather than correcting it.
fn rewrite_key_prefix(key: &str, owner_name: &str) -> String {
    let key_prefix_len = key.char_indices().nth(4).map(|(i, _)| i).unwrap_or(key.len());
    let owner_prefix_len = owner_name.char_indices().nth(4).map(|(i, _)| i).unwrap_or(owner_name.len());
    let owner_prefix = &owner_name[..owner_prefix_len];
    format!("{}{}", owner_prefix, &key[key_prefix_len..])
}

struct OrderedKey {
    qualified: String,
    order_clause: String,
}

/// Builds the `CREATE VIEW` for an INDEX set. Member tables not present
/// in the catalog, and sort keys naming a column the table doesn't have,
/// are logged and skipped; everything else in the set is still emitted.
pub fn migrate_index_set(set_name: &str, file_contents: &str, catalog: &Catalog) -> String {
    let view_name = format!("{}_view", to_snake(set_name.replacen("IX-", "", 1).as_str()));

    let mut from_tables: Vec<String> = Vec::new();
    let mut ordered_keys: Vec<OrderedKey> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let member_re = set_member_re();
    let members: Vec<_> = member_re.captures_iter(file_contents).collect();

    for (i, member) in members.iter().enumerate() {
        let table_name = to_snake(&member["table"]);
        from_tables.push(format!("\t{}", table_name));

        let Some(table) = catalog.get(&table_name) else {
            error!(table = %table_name, "migrated table not found");
            continue;
        };

        // The member's initial sort key picks up a double leading tab in its
        // ORDER BY entry (the qualified name's own tab, plus one more), since
        // it's built from the already-tab-prefixed qualified name; keys found
        // afterward in the window scan get a single leading tab.
        let mut push_key = |key: &str, order: &str, initial: bool, seen: &mut std::collections::HashSet<String>| {
            let key = to_snake(key);
            if table.has_column(&key) {
                let qualified = format!("{}.{}", table_name, key);
                if seen.insert(qualified.clone()) {
                    let tabs = if initial { "\t\t" } else { "\t" };
                    ordered_keys.push(OrderedKey {
                        qualified: format!("\t{}", qualified),
                        order_clause: format!("{}{} {}", tabs, qualified, order),
                    });
                }
            } else {
                warn!(
                    column = %key,
                    table = %table_name,
                    set = set_name,
                    "column not found while building view from IDMS set"
                );
            }
        };

        push_key(&member["key"], &member["order"], true, &mut seen);

        let keys_start = member.get(0).unwrap().end();
        let keys_end = if i + 1 < members.len() {
            members[i + 1].get(0).unwrap().start().saturating_sub(1)
        } else {
            file_contents.len().saturating_sub(1)
        };
        let window = &file_contents[keys_start.min(file_contents.len())..keys_end.min(file_contents.len()).max(keys_start.min(file_contents.len()))];

        for key_match in set_member_key_re().captures_iter(window) {
            push_key(&key_match["key"], &key_match["order"], false, &mut seen);
        }
    }

    let joined_keys = ordered_keys.iter().map(|k| k.qualified.clone()).collect::<Vec<_>>().join(",\n");
    let joined_tables = from_tables.join(",\n");
    let joined_order = ordered_keys.iter().map(|k| k.order_clause.clone()).collect::<Vec<_>>().join(",\n");

    format!(
        "\nCREATE VIEW {} AS\nSELECT\n{}\nFROM\n{}\nORDER BY\n{};\n",
        view_name, joined_keys, joined_tables, joined_order
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::column::Column;
    use crate::table::Table;

    fn catalog_with(name: &str, cols: &[&str]) -> Catalog {
        let mut catalog = Catalog::new();
        let mut t = Table::new(name);
        for c in cols {
            t.push_column(Column::new(*c, "X(9)", None).unwrap());
        }
        catalog.insert(name.to_string(), t);
        catalog
    }

    #[test]
    fn test_parse_header_chain() {
        let h = parse_header("SET....... ORDER-SET MODE CHAIN\n").unwrap();
        assert_eq!(h.name, "ORDER-SET");
        assert_eq!(h.mode, SetMode::Chain);
    }

    #[test]
    fn test_parse_header_missing() {
        assert!(parse_header("nothing here").is_err());
    }

    #[test]
    fn test_s4_chain_set_fk() {
        let mut catalog = catalog_with("customer_record", &["cust_id"]);
        catalog.extend(catalog_with("order_record", &["cust_id"]));
        let content = "SET..... ORDER-SET MODE CHAIN\n\
                        OWNER... CUSTOMER-RECORD\n\
                        MEMBER... ORDER-RECORD some text\n\
                        more text SORT KEY CUST-ID ASC\n";
        let sql = migrate_chain_set("ORDER-SET", content, &catalog, true);
        assert_eq!(
            sql,
            "\nALTER TABLE order_record ADD FOREIGN KEY (cust_id) REFERENCES customer_record(cust_id);\n"
        );
    }

    #[test]
    fn test_chain_set_gated_on_migrate_fks() {
        let catalog = catalog_with("customer_record", &["cust_id"]);
        let content = "SET..... ORDER-SET MODE CHAIN\nOWNER... CUSTOMER-RECORD\n";
        assert_eq!(migrate_chain_set("ORDER-SET", content, &catalog, false), "");
    }

    #[test]
    fn test_s5_index_set_view() {
        let catalog = catalog_with("customer_record", &["last_name"]);
        let content = "SET..... IX-CUST-BY-NAME MODE INDEX\n\
                        MEMBER... CUSTOMER-RECORD some text\n\
                        more text SORT KEY LAST-NAME ASC\n";
        let sql = migrate_index_set("IX-CUST-BY-NAME", content, &catalog);
        assert!(sql.contains("CREATE VIEW cust_by_name_view AS"));
        assert!(sql.contains("customer_record.last_name"));
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("customer_record.last_name ASC"));
    }
}
