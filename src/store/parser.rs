//! Reload blob parsing.
//!
//! # Format
//! ```text
//! # comment
//! [namespace]
//! key = value
//! ```
//!
//! # Design Decisions
//! - Fail-soft: a malformed line is skipped, never the whole blob
//! - Split on the first `=` only, so values may contain `=`
//! - Namespaces and keys are case-sensitive and trimmed

/// One `(namespace, key, value)` triple extracted from a reload blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry<'a> {
    pub namespace: &'a str,
    pub key: &'a str,
    pub value: &'a str,
}

/// Iterator over the valid entries of a reload blob, in document order.
#[derive(Debug)]
pub struct EntryParser<'a> {
    lines: std::str::Lines<'a>,
    namespace: Option<&'a str>,
}

impl<'a> EntryParser<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            namespace: None,
        }
    }
}

impl<'a> Iterator for EntryParser<'a> {
    type Item = ConfigEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                self.namespace = Some(line[1..line.len() - 1].trim());
                continue;
            }

            let Some(namespace) = self.namespace.filter(|ns| !ns.is_empty()) else {
                tracing::trace!(line, "Skipping config line outside of a namespace");
                continue;
            };

            if let Some(entry) = parse_line(namespace, line) {
                return Some(entry);
            }
        }
        None
    }
}

/// Parse a single `key=value` line under `namespace`.
fn parse_line<'a>(namespace: &'a str, line: &'a str) -> Option<ConfigEntry<'a>> {
    let (raw_key, raw_value) = line.split_once('=')?;
    let key = raw_key.trim();
    let value = raw_value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some(ConfigEntry {
        namespace,
        key,
        value,
    })
}

/// Parse a whole reload blob.
pub fn parse_entries(content: &str) -> EntryParser<'_> {
    EntryParser::new(content)
}

/// Split a full config name (`namespace.key`) at the first `.`.
///
/// Returns `None` unless both halves are non-empty.
pub fn split_config_name(name: &str) -> Option<(&str, &str)> {
    let (namespace, key) = name.split_once('.')?;
    if namespace.is_empty() || key.is_empty() {
        return None;
    }
    Some((namespace, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str) -> Vec<(String, String, String)> {
        parse_entries(content)
            .map(|e| (e.namespace.to_string(), e.key.to_string(), e.value.to_string()))
            .collect()
    }

    #[test]
    fn test_sections_and_entries() {
        let blob = "# header\n[app]\nport = 8080\nname=svc\n\n[db]\nurl = postgres://h/db?a=b\n";
        assert_eq!(
            collect(blob),
            vec![
                ("app".into(), "port".into(), "8080".into()),
                ("app".into(), "name".into(), "svc".into()),
                ("db".into(), "url".into(), "postgres://h/db?a=b".into()),
            ]
        );
    }

    #[test]
    fn test_lines_before_header_are_ignored() {
        assert!(collect("orphan=1\n").is_empty());
        assert_eq!(collect("orphan=1\n[a]\nk=v").len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let blob = "[a]\nno equals sign\n=value\nkey=\n  =  \nok=1\n#k=2";
        assert_eq!(collect(blob), vec![("a".into(), "ok".into(), "1".into())]);
    }

    #[test]
    fn test_namespace_is_trimmed() {
        assert_eq!(
            collect("[ spaced ]\nk=v"),
            vec![("spaced".into(), "k".into(), "v".into())]
        );
        // Blank namespace disables the section
        assert!(collect("[  ]\nk=v").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(
            collect("[a]\r\nk=v\r\n"),
            vec![("a".into(), "k".into(), "v".into())]
        );
    }

    #[test]
    fn test_split_config_name() {
        assert_eq!(split_config_name("a.b"), Some(("a", "b")));
        assert_eq!(split_config_name("a.b.c"), Some(("a", "b.c")));
        assert_eq!(split_config_name("ab"), None);
        assert_eq!(split_config_name(".b"), None);
        assert_eq!(split_config_name("a."), None);
        assert_eq!(split_config_name(""), None);
    }
}
