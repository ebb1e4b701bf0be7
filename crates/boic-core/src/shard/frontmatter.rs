//! Frontmatter splitting
//!
//! A shard starts with a YAML header between two `---` lines. Files that do
//! not open with the delimiter have no header and are all body.

const DELIMITER: &str = "---";

/// Split `content` into its YAML header (if any) and body.
///
/// Fails only when a header is opened but never closed.
pub(crate) fn split(content: &str) -> Result<(Option<&str>, &str), String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, content));
    };
    if first.trim_end() != DELIMITER {
        return Ok((None, content));
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let header = &content[header_start..offset];
            let body = &content[offset + line.len()..];
            return Ok((Some(header), body));
        }
        offset += line.len();
    }

    Err("unterminated frontmatter header".to_string())
}

/// Parse a header into a mapping; an empty header is an empty mapping
pub(crate) fn parse_header(header: &str) -> Result<serde_yaml::Mapping, String> {
    match serde_yaml::from_str::<serde_yaml::Value>(header) {
        Ok(serde_yaml::Value::Mapping(mapping)) => Ok(mapping),
        Ok(serde_yaml::Value::Null) => Ok(serde_yaml::Mapping::new()),
        Ok(other) => Err(format!(
            "frontmatter must be a key/value mapping, found {}",
            kind(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

fn kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_and_body() {
        let (header, body) = split("---\nnom: Usine\n---\n# Titre\n").unwrap();
        assert_eq!(header, Some("nom: Usine\n"));
        assert_eq!(body, "# Titre\n");
    }

    #[test]
    fn test_split_windows_line_endings() {
        let (header, body) = split("---\r\nnom: Usine\r\n---\r\ncorps").unwrap();
        assert_eq!(header, Some("nom: Usine\r\n"));
        assert_eq!(body, "corps");
    }

    #[test]
    fn test_split_without_header() {
        let (header, body) = split("# Titre\n---\n").unwrap();
        assert_eq!(header, None);
        assert_eq!(body, "# Titre\n---\n");
    }

    #[test]
    fn test_split_header_at_end_of_file() {
        let (header, body) = split("---\na: 1\n---").unwrap();
        assert_eq!(header, Some("a: 1\n"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_unterminated() {
        assert!(split("---\nnom: Usine\n").is_err());
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header("a: 1\nb: [x]\n").unwrap().len(), 2);
        assert!(parse_header("").unwrap().is_empty());
        assert!(parse_header("- a\n- b\n").is_err());
        assert!(parse_header("a: [1, 2").is_err());
    }
}
