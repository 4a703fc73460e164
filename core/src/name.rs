//! Converts IDMS identifiers (upper-case, hyphen/colon-separated) into
//! `snake_case` or `camelCase`.

use regex::Regex;

/// `CUST-ID` -> `cust_id`. Only the two listed transforms are applied;
/// nothing else in the name is touched.
pub fn to_snake(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}

/// `CUST-ID` -> `custId`, `IX-CUST:NAME` -> `ixCustName`.
///
/// Only `to_snake` is used by the migration pipeline; this is kept as a
/// utility for callers that want the other convention.
pub fn to_camel(name: &str) -> String {
    let trimmed = name.trim();
    let split_re = Regex::new(r"[-:]").unwrap();
    let segments: Vec<&str> = split_re.split(trimmed).collect();

    if segments.len() > 1 {
        let mut out = String::new();
        for (i, seg) in segments.iter().enumerate() {
            if i == 0 {
                out.push_str(&seg.to_lowercase());
            } else {
                out.push_str(&title_case(seg));
            }
        }
        out
    } else {
        split_re.replace_all(trimmed, "").to_lowercase()
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_snake() {
        assert_eq!(to_snake("CUST-ID"), "cust_id");
        assert_eq!(to_snake("  CUSTOMER-RECORD  "), "customer_record");
        assert_eq!(to_snake("ALREADY_SNAKE"), "already_snake");
    }

    #[test]
    fn test_to_snake_idempotent() {
        let x = "CUST-ID";
        assert_eq!(to_snake(&to_snake(x)), to_snake(x));
    }

    #[test]
    fn test_to_camel_multi_segment() {
        assert_eq!(to_camel("CUST-ID"), "custId");
        assert_eq!(to_camel("IX-CUST-BY-NAME"), "ixCustByName");
    }

    #[test]
    fn test_to_camel_single_segment() {
        assert_eq!(to_camel("CUSTOMER"), "customer");
    }
}
