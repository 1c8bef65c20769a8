//! Dotted node paths such as `"Layer.Group 1.Stroke 1.Color"`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Name(String),
    /// `*`: exactly one node of any name.
    Any,
    /// `**`: zero or more nodes.
    AnyDepth,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw {
            "*" => Segment::Any,
            "**" => Segment::AnyDepth,
            name => Segment::Name(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypath {
    raw: String,
    segments: Vec<Segment>,
}

impl Keypath {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw.split('.').any(str::is_empty) {
            return Err(Error::InvalidKeypath(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments: raw.split('.').map(Segment::parse).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Node pattern plus the trailing property name. `None` when the last
    /// segment is a wildcard or there is no node part.
    pub fn split_property(&self) -> Option<(&[Segment], &str)> {
        let (last, nodes) = self.segments.split_last()?;
        match last {
            Segment::Name(name) if !nodes.is_empty() => Some((nodes, name.as_str())),
            _ => None,
        }
    }

    /// Whether the whole keypath addresses the node with the given chain of
    /// names, root first.
    pub fn matches_node<S: AsRef<str>>(&self, names: &[S]) -> bool {
        matches(&self.segments, names)
    }
}

/// Glob-style match of `pattern` against a root-first chain of node names.
pub fn matches<S: AsRef<str>>(pattern: &[Segment], names: &[S]) -> bool {
    match pattern.split_first() {
        None => names.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=names.len()).any(|skip| matches(rest, &names[skip..]))
        }
        Some((head, rest)) => match names.split_first() {
            None => false,
            Some((name, tail)) => {
                let name: &str = name.as_ref();
                let hit = match head {
                    Segment::Name(expected) => expected == name,
                    _ => true,
                };
                hit && matches(rest, tail)
            }
        },
    }
}

impl FromStr for Keypath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Keypath::parse(s)
    }
}

impl fmt::Display for Keypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(path: &str) -> Vec<Segment> {
        Keypath::parse(path).expect("valid keypath").segments().to_vec()
    }

    #[test]
    fn test_rejects_empty_segments() {
        assert!(matches!(Keypath::parse(""), Err(Error::InvalidKeypath(_))));
        assert!(matches!(Keypath::parse("Layer..Color"), Err(Error::InvalidKeypath(_))));
        assert!(matches!(Keypath::parse("Layer.Color."), Err(Error::InvalidKeypath(_))));
    }

    #[test]
    fn test_split_property() {
        let kp = Keypath::parse("Layer.Group 1.Stroke 1.Color").expect("valid keypath");
        let (node_part, property) = kp.split_property().expect("has property");
        assert_eq!(property, "Color");
        assert_eq!(node_part.len(), 3);

        assert!(Keypath::parse("Color").expect("valid").split_property().is_none());
        assert!(Keypath::parse("Layer.*").expect("valid").split_property().is_none());
    }

    #[test]
    fn test_single_wildcard_matches_one_level() {
        let pattern = nodes("Layer.*.Stroke 1");
        assert!(matches(&pattern, &["Layer", "Group 1", "Stroke 1"]));
        assert!(!matches(&pattern, &["Layer", "Stroke 1"]));
        assert!(!matches(&pattern, &["Layer", "Group 1", "Inner", "Stroke 1"]));
    }

    #[test]
    fn test_double_wildcard_matches_any_depth() {
        let pattern = nodes("Layer.**.Stroke 1");
        assert!(matches(&pattern, &["Layer", "Stroke 1"]));
        assert!(matches(&pattern, &["Layer", "Group 1", "Stroke 1"]));
        assert!(matches(&pattern, &["Layer", "A", "B", "Stroke 1"]));
        assert!(!matches(&pattern, &["Other", "Stroke 1"]));

        let everything = nodes("**");
        assert!(matches(&everything, &["Layer"]));
        assert!(matches::<&str>(&everything, &[]));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let kp = Keypath::parse("layer.Stroke 1").expect("valid");
        assert!(!kp.matches_node(&["Layer", "Stroke 1"]));
        assert!(kp.matches_node(&["layer", "Stroke 1"]));
    }
}
