/*!
 * nmcli output parsing
 * Terse colon-delimited tables, `key: value` detail blocks and scalar lines
 */

use std::collections::BTreeMap;

/// Record types that can be built from one terse line's positional fields.
///
/// Fields past the end of a short line are simply absent; implementations
/// must not fail on ragged input.
pub trait FromFields: Sized {
    fn from_fields(fields: Fields) -> Self;
}

/// Positional fields of a single terse line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields(Vec<String>);

impl Fields {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn text(&self, index: usize) -> Option<String> {
        self.get(index).map(str::to_string)
    }

    /// Field coerced to a number; `None` when absent or not numeric.
    pub fn number<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|value| value.trim().parse().ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split one terse line on `:`.
///
/// nmcli escapes a literal colon as `\:` and a backslash as `\\` in terse
/// mode, so those sequences stay inside the current field.
pub fn split_terse(line: &str) -> Fields {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (':' | '\\')) => current.push(next),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    Fields(fields)
}

/// Parse terse tabular output into one record per non-blank line, in order.
pub fn parse_tabular<T: FromFields>(text: &str) -> Vec<T> {
    text.trim_end()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| T::from_fields(split_terse(line)))
        .collect()
}

/// Parse a `field.name:   value` block into a flat mapping.
pub fn parse_detail(text: &str) -> BTreeMap<String, String> {
    let mut detail = BTreeMap::new();

    for line in text.trim().lines() {
        let line = collapse_separators(line);
        let line = line.trim();
        if let Some((name, value)) = line.split_once(':') {
            detail.insert(name.to_string(), value.to_string());
        }
    }

    detail
}

/// Replace every colon followed by whitespace with a bare colon.
fn collapse_separators(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut after_colon = false;

    for c in line.chars() {
        if after_colon && c.is_whitespace() {
            continue;
        }
        after_colon = c == ':';
        out.push(c);
    }

    out
}

/// First non-blank line of single-value output, trimmed.
pub fn parse_scalar(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// `8-4-4-4-12` lowercase hex groups separated by dashes.
pub fn is_uuid(id: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let mut parts = id.split('-');
    for expected in GROUPS {
        match parts.next() {
            Some(part)
                if part.len() == expected
                    && part.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) => {}
            _ => return false,
        }
    }

    parts.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        left: String,
        right: Option<String>,
    }

    impl FromFields for Pair {
        fn from_fields(fields: Fields) -> Self {
            Self {
                left: fields.text(0).unwrap_or_default(),
                right: fields.text(1),
            }
        }
    }

    #[test]
    fn tabular_keeps_line_order_and_positions() {
        let rows: Vec<Pair> = parse_tabular("a:1\nb:2\nc:3\n");
        let lefts: Vec<&str> = rows.iter().map(|r| r.left.as_str()).collect();
        assert_eq!(lefts, ["a", "b", "c"]);
        assert_eq!(rows[1].right.as_deref(), Some("2"));
    }

    #[test]
    fn tabular_empty_input_is_empty() {
        assert!(parse_tabular::<Pair>("").is_empty());
        assert!(parse_tabular::<Pair>("\n\n").is_empty());
    }

    #[test]
    fn tabular_short_line_leaves_fields_absent() {
        let rows: Vec<Pair> = parse_tabular("lonely");
        assert_eq!(
            rows,
            vec![Pair {
                left: "lonely".into(),
                right: None
            }]
        );
    }

    #[test]
    fn terse_escapes_stay_in_field() {
        let fields = split_terse(r"Cafe\: Upstairs:Infra:C\\D");
        assert_eq!(fields.get(0), Some("Cafe: Upstairs"));
        assert_eq!(fields.get(1), Some("Infra"));
        assert_eq!(fields.get(2), Some(r"C\D"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn terse_keeps_empty_fields() {
        let fields = split_terse(":Infra::");
        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get(0), Some(""));
        assert_eq!(fields.get(3), Some(""));
    }

    #[test]
    fn number_coercion_is_lenient() {
        let fields = split_terse("11: 74 :abc:");
        assert_eq!(fields.number::<u32>(0), Some(11));
        assert_eq!(fields.number::<u8>(1), Some(74));
        assert_eq!(fields.number::<u8>(2), None);
        assert_eq!(fields.number::<u8>(3), None);
        assert_eq!(fields.number::<u8>(9), None);
    }

    #[test]
    fn detail_collapses_separator_runs() {
        let detail = parse_detail("connection.id:    Foobar\nconnection.uuid:  12c8-...");
        assert_eq!(detail.len(), 2);
        assert_eq!(detail["connection.id"], "Foobar");
        assert_eq!(detail["connection.uuid"], "12c8-...");
    }

    #[test]
    fn detail_skips_lines_without_colon() {
        let text =
            "\nconnection.id:   Foobar\n\n   garbage line\nconnection.timestamp:\t1416962187\n";
        let detail = parse_detail(text);
        assert_eq!(detail.len(), 2);
        assert_eq!(detail["connection.timestamp"], "1416962187");
    }

    #[test]
    fn detail_value_keeps_later_colons() {
        let detail = parse_detail("802-11-wireless.mac-address:   AA:BB:CC:DD:EE:FF");
        assert_eq!(detail["802-11-wireless.mac-address"], "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn scalar_takes_first_line() {
        assert_eq!(parse_scalar("full\n").as_deref(), Some("full"));
        assert_eq!(parse_scalar("\n  limited \nx"), Some("limited".to_string()));
        assert_eq!(parse_scalar(""), None);
    }

    #[test]
    fn uuid_classification() {
        assert!(is_uuid("12c8b6a5-31d1-4ea8-a1af-b541da345df1"));
        assert!(!is_uuid("Foobar"));
        assert!(!is_uuid(""));
        assert!(!is_uuid("12C8B6A5-31D1-4EA8-A1AF-B541DA345DF1"));
        assert!(!is_uuid("12c8b6a5-31d1-4ea8-a1af-b541da345df1-00"));
        assert!(!is_uuid("12c8b6a531d14ea8a1afb541da345df1"));
        assert!(!is_uuid("12c8b6a5-31d1-4ea8-a1af-b541da345dfg"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "a:1\nb\n:3\n";
        assert_eq!(parse_tabular::<Pair>(text), parse_tabular::<Pair>(text));
    }
}
