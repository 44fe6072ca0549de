//! `Link` header parsing (RFC 8288).
//!
//! Meetup's v3 endpoints announce the next page with a header such as:
//!
//! ```text
//! Link: <https://api.meetup.com/OpenTwinCities/events/111/attendance?page=50&offset=1>; rel="next"
//! ```
//!
//! A header may carry several link-values separated by commas, and a
//! response may carry several `Link` headers (joined by the transport).

use std::iter::Peekable;
use std::str::Chars;

use url::Url;

/// One link-value of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue {
    /// The URI reference between `<` and `>`.
    pub target: String,
    /// Link parameters in order, keys lowercased.
    pub params: Vec<(String, String)>,
}

impl LinkValue {
    /// Returns true if any `rel` parameter lists `relation`.
    ///
    /// Relation types compare case-insensitively and a single `rel` may list
    /// several space-separated types.
    pub fn has_rel(&self, relation: &str) -> bool {
        self.params
            .iter()
            .filter(|(key, _)| key == "rel")
            .any(|(_, value)| {
                value
                    .split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case(relation))
            })
    }
}

/// Parses every link-value of a `Link` header.
///
/// Malformed entries are skipped rather than failing the whole header.
pub fn parse_link_header(header: &str) -> Vec<LinkValue> {
    let mut links = Vec::new();
    let mut chars = header.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
            chars.next();
        }

        match chars.next() {
            None => break,
            Some('<') => {}
            Some(_) => {
                skip_to_separator(&mut chars);
                continue;
            }
        }

        let target: String = chars.by_ref().take_while(|c| *c != '>').collect();
        let params = parse_params(&mut chars);
        skip_to_separator(&mut chars);

        links.push(LinkValue {
            target: target.trim().to_string(),
            params,
        });
    }

    links
}

/// Finds the target of the link with the given relation.
///
/// When several links carry the relation, the last one wins. Relative
/// targets are resolved against `base`, the URL the response came from.
pub fn find_rel(header: &str, relation: &str, base: &str) -> Option<String> {
    let link = parse_link_header(header)
        .into_iter()
        .rev()
        .find(|link| link.has_rel(relation) && !link.target.is_empty())?;

    if Url::parse(&link.target).is_ok() {
        return Some(link.target);
    }

    match Url::parse(base).and_then(|b| b.join(&link.target)) {
        Ok(resolved) => Some(resolved.into()),
        Err(_) => Some(link.target),
    }
}

/// Parses `; key=value` pairs following a link target.
fn parse_params(chars: &mut Peekable<Chars<'_>>) -> Vec<(String, String)> {
    let mut params = Vec::new();

    loop {
        skip_whitespace(chars);
        if chars.peek() != Some(&';') {
            break;
        }
        chars.next();
        skip_whitespace(chars);

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' || c == ',' {
                break;
            }
            key.push(c);
            chars.next();
        }

        let mut value = String::new();
        if chars.peek() == Some(&'=') {
            chars.next();
            skip_whitespace(chars);

            if chars.peek() == Some(&'"') {
                chars.next();
                let mut escaped = false;
                for c in chars.by_ref() {
                    if escaped {
                        value.push(c);
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        break;
                    } else {
                        value.push(c);
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == ';' || c == ',' || c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }
        }

        let key = key.trim().to_ascii_lowercase();
        if !key.is_empty() {
            params.push((key, value));
        }
    }

    params
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

/// Consumes input up to, not including, the next `,`.
fn skip_to_separator(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| *c != ',') {
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.meetup.com/OpenTwinCities/events/111/attendance";

    #[test]
    fn parse_single_next() {
        let header = r#"<https://api.meetup.com/OpenTwinCities/events/111/attendance?offset=1>; rel="next""#;
        let links = parse_link_header(header);

        assert_eq!(links.len(), 1);
        assert_eq!(
            links[0].target,
            "https://api.meetup.com/OpenTwinCities/events/111/attendance?offset=1"
        );
        assert!(links[0].has_rel("next"));
        assert!(!links[0].has_rel("prev"));
    }

    #[test]
    fn parse_multiple_links() {
        let header = r#"<https://example.com/p?page=1>; rel="prev", <https://example.com/p?page=3>; rel="next"; title="more""#;
        let links = parse_link_header(header);

        assert_eq!(links.len(), 2);
        assert!(links[0].has_rel("prev"));
        assert!(links[1].has_rel("next"));
        assert_eq!(
            links[1].params,
            vec![
                ("rel".to_string(), "next".to_string()),
                ("title".to_string(), "more".to_string()),
            ]
        );
    }

    #[test]
    fn target_may_contain_commas_and_semicolons() {
        let header = r#"<https://example.com/p?fields=a,b;c>; rel=next"#;
        let links = parse_link_header(header);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://example.com/p?fields=a,b;c");
        assert!(links[0].has_rel("next"));
    }

    #[test]
    fn rel_lists_and_case() {
        let header = r#"<https://example.com/2>; REL="Next last""#;
        let links = parse_link_header(header);
        assert!(links[0].has_rel("next"));
        assert!(links[0].has_rel("last"));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let header = r#"garbage; rel="next", <https://example.com/2>; rel="next""#;
        let links = parse_link_header(header);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://example.com/2");
    }

    #[test]
    fn empty_header() {
        assert!(parse_link_header("").is_empty());
        assert!(parse_link_header("  ,  ").is_empty());
    }

    #[test]
    fn find_next_absolute() {
        let header = r#"<https://example.com/1>; rel="prev", <https://example.com/3>; rel="next""#;
        assert_eq!(
            find_rel(header, "next", BASE),
            Some("https://example.com/3".to_string())
        );
        assert_eq!(
            find_rel(header, "prev", BASE),
            Some("https://example.com/1".to_string())
        );
    }

    #[test]
    fn find_next_relative() {
        let header = r#"</OpenTwinCities/events/111/attendance?offset=2>; rel="next""#;
        assert_eq!(
            find_rel(header, "next", BASE),
            Some("https://api.meetup.com/OpenTwinCities/events/111/attendance?offset=2".to_string())
        );
    }

    #[test]
    fn find_repeated_relation_takes_last() {
        let header = r#"<https://example.com/2>; rel="next", <https://example.com/3>; rel="next""#;
        assert_eq!(
            find_rel(header, "next", BASE),
            Some("https://example.com/3".to_string())
        );
    }

    #[test]
    fn find_missing_relation() {
        let header = r#"<https://example.com/1>; rel="prev""#;
        assert_eq!(find_rel(header, "next", BASE), None);
        assert_eq!(find_rel(r#"<>; rel="next""#, "next", BASE), None);
    }
}
