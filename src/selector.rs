//! Minimal CSS selector support for blueprint discovery and population.
//!
//! Only what the renderer needs is understood: type selectors, `*`, `#id`,
//! `.class`, `[attr]` and `[attr=value]`, combined into compound selectors
//! and comma-separated lists. Combinators and pseudo-classes are rejected.

use crate::dom::Element;
use crate::{Error, Result};

/// A parsed selector list (`a, .caption`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self> {
        let mut compounds = Vec::new();
        for raw in input.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(Error::Other(format!("Empty selector in '{}'", input)));
            }
            compounds.push(parse_compound(raw).map_err(|reason| {
                Error::Other(format!("Invalid selector '{}': {}", input, reason))
            })?);
        }
        Ok(Self { compounds })
    }

    /// Whether `element` matches any selector in the list.
    pub fn matches(&self, element: &Element) -> bool {
        self.compounds.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            Part::Id(id) => element.attr("id") == Some(id.as_str()),
            Part::Class(class) => element.has_class(class),
            Part::Attr { name, value: None } => element.attr(name).is_some(),
            Part::Attr {
                name,
                value: Some(expected),
            } => element.attr(name) == Some(expected.as_str()),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn take_ident(chars: &[char], pos: &mut usize) -> std::result::Result<String, String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    if start == *pos {
        return Err(format!("expected identifier at offset {}", start));
    }
    Ok(chars[start..*pos].iter().collect())
}

fn parse_compound(raw: &str) -> std::result::Result<Compound, String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars[0] == '*' {
        pos = 1;
    } else if is_ident_char(chars[0]) {
        compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.parts.push(Part::Id(take_ident(&chars, &mut pos)?));
            }
            '.' => {
                pos += 1;
                compound.parts.push(Part::Class(take_ident(&chars, &mut pos)?));
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos)?.to_ascii_lowercase();
                let value = if chars.get(pos) == Some(&'=') {
                    pos += 1;
                    Some(take_attr_value(&chars, &mut pos)?)
                } else {
                    None
                };
                if chars.get(pos) != Some(&']') {
                    return Err(format!("expected ']' at offset {}", pos));
                }
                pos += 1;
                compound.parts.push(Part::Attr { name, value });
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err("combinators are not supported".to_string());
            }
            c => return Err(format!("unexpected '{}' at offset {}", c, pos)),
        }
    }
    Ok(compound)
}

fn take_attr_value(chars: &[char], pos: &mut usize) -> std::result::Result<String, String> {
    match chars.get(*pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            let start = *pos + 1;
            let end = chars[start..]
                .iter()
                .position(|&c| c == quote)
                .map(|offset| start + offset)
                .ok_or_else(|| "unterminated string".to_string())?;
            *pos = end + 1;
            Ok(chars[start..end].iter().collect())
        }
        _ => take_ident(chars, pos),
    }
}
