//! Compound simple selectors for the header DOM contract.
//!
//! Supports `tag`, `#id`, `.class`, `[attr]` and `[attr=value]` (quoted or
//! bare values), combined without whitespace: `a.nav-link[data-lang-switch]`.
//! Combinators are not supported; scoping is done by querying under a root.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::header::dom::{has_class, Dom, ElementId};

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("combinators are not supported in '{0}'")]
    Combinator(String),

    #[error("unterminated attribute selector in '{0}'")]
    UnterminatedAttribute(String),

    #[error("missing name after '{marker}' in '{selector}'")]
    MissingName { marker: char, selector: String },
}

/// A single condition of a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
    Never,
}

/// Parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    parts: Vec<Part>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }
        if source.contains(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~' || c == ',') {
            return Err(SelectorError::Combinator(source.to_string()));
        }

        let mut parts = Vec::new();
        let mut rest = source;

        while let Some(first) = rest.chars().next() {
            match first {
                '#' | '.' => {
                    let (name, tail) = take_name(&rest[1..]);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName {
                            marker: first,
                            selector: source.to_string(),
                        });
                    }
                    parts.push(if first == '#' {
                        Part::Id(name.to_string())
                    } else {
                        Part::Class(name.to_string())
                    });
                    rest = tail;
                }
                '[' => {
                    let end = rest
                        .find(']')
                        .ok_or_else(|| SelectorError::UnterminatedAttribute(source.to_string()))?;
                    parts.push(parse_attribute(&rest[1..end], source)?);
                    rest = &rest[end + 1..];
                }
                _ => {
                    let (name, tail) = take_name(rest);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName {
                            marker: first,
                            selector: source.to_string(),
                        });
                    }
                    parts.push(Part::Tag(name.to_ascii_lowercase()));
                    rest = tail;
                }
            }
        }

        Ok(Self {
            source: source.to_string(),
            parts,
        })
    }

    /// A selector that matches no element.
    pub(crate) fn never() -> Self {
        Self {
            source: String::new(),
            parts: vec![Part::Never],
        }
    }

    /// Whether the element satisfies every condition.
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, el: ElementId) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => dom.tag(el).eq_ignore_ascii_case(tag),
            Part::Id(id) => dom.attr(el, "id") == Some(id.as_str()),
            Part::Class(class) => has_class(dom, el, class),
            Part::HasAttr(name) => dom.attr(el, name).is_some(),
            Part::AttrEq(name, value) => dom.attr(el, name) == Some(value.as_str()),
            Part::Never => false,
        })
    }

    /// Selector text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn take_name(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| matches!(c, '#' | '.' | '['))
        .unwrap_or(input.len());
    input.split_at(end)
}

fn parse_attribute(body: &str, source: &str) -> Result<Part, SelectorError> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            if name.is_empty() {
                return Err(SelectorError::MissingName {
                    marker: '[',
                    selector: source.to_string(),
                });
            }
            Ok(Part::HasAttr(name.to_string()))
        }
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(SelectorError::MissingName {
                    marker: '[',
                    selector: source.to_string(),
                });
            }
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Ok(Part::AttrEq(name.to_string(), value.to_string()))
        }
    }
}
