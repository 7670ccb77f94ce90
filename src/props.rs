//! the `> <TAG>` data-item section trailing the connection table

/// tag of a data-item header line like `> <INCHIKEY>` or `>  <NAME>`,
/// tolerating the drifting space counts seen in the wild
fn header_tag(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    let open = rest.find('<')?;
    let close = rest[open + 1..].find('>')?;
    Some(&rest[open + 1..open + 1 + close])
}

/// collect `(tag, value)` pairs from a block's data items. a value runs
/// from the line after its header to the next blank line
pub fn data_items(lines: &[String]) -> Vec<(String, String)> {
    let mut items = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(tag) = header_tag(&lines[i]) else {
            i += 1;
            continue;
        };
        let start = i + 1;
        let mut end = start;
        while end < lines.len() && !lines[end].trim().is_empty() {
            end += 1;
        }
        items.push((tag.to_owned(), lines[start..end].join("\n")));
        i = end;
    }
    items
}

pub fn has_prop(lines: &[String], tag: &str) -> bool {
    lines.iter().any(|l| header_tag(l) == Some(tag))
}

/// the value of the first data item carrying `tag`, if any
pub fn prop_value(lines: &[String], tag: &str) -> Option<String> {
    data_items(lines)
        .into_iter()
        .find_map(|(t, v)| (t == tag).then_some(v))
}

/// which of `required` is not present as a data item
pub fn missing_props<'a>(
    lines: &[String],
    required: &'a [String],
) -> Vec<&'a str> {
    required
        .iter()
        .filter(|tag| !has_prop(lines, tag))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_tags() {
        assert_eq!(header_tag("> <ID>"), Some("ID"));
        assert_eq!(header_tag(">  <NAME>"), Some("NAME"));
        assert_eq!(header_tag("> <MASS SPECTRAL PEAKS>"), Some("MASS SPECTRAL PEAKS"));
        assert_eq!(header_tag("plain line"), None);
        assert_eq!(header_tag(">"), None);
    }

    #[test]
    fn single_line_value() {
        let b = lines(&["M  END", "> <ID>", "123", "", "> <NAME>", "x", ""]);
        assert_eq!(prop_value(&b, "ID").as_deref(), Some("123"));
        assert_eq!(prop_value(&b, "NAME").as_deref(), Some("x"));
        assert_eq!(prop_value(&b, "INCHI"), None);
    }

    #[test]
    fn multi_line_value() {
        let b = lines(&[
            "> <MASS SPECTRAL PEAKS>", "73 10", "147 25", "", "> <ID>",
            "9", "",
        ]);
        assert_eq!(
            prop_value(&b, "MASS SPECTRAL PEAKS").as_deref(),
            Some("73 10\n147 25")
        );
    }

    #[test]
    fn screening() {
        let b = lines(&["> <NAME>", "x", "", "> <INCHI>", "y", ""]);
        let required = lines(&["NAME", "INCHI", "INCHIKEY"]);
        assert_eq!(missing_props(&b, &required), vec!["INCHIKEY"]);
        assert!(has_prop(&b, "NAME"));
        assert!(!has_prop(&b, "EXACT MASS"));
    }
}
