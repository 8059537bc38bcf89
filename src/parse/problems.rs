//! The problems system is the core error handling mechanism of the parser.
//!
//! A defect in a definition file becomes a [`Problem`], is pinned to its
//! position in the file ([`ProblemAt`]) and is then either handled, by
//! falling back to a default and recording the action taken
//! ([`HandledProblem`]), or returned as [`ParseError::Schema`](crate::ParseError::Schema)
//! if no sensible fallback exists.

use std::fmt::Display;

use roxmltree::{Node, TextPos};

use crate::{EntityKind, Name};

pub type Problems = Vec<HandledProblem>;

/// A recoverable problem in a definition file, with position information and
/// info on the action taken to recover from it.
#[derive(thiserror::Error, Debug)]
#[error("{p}; {action}")]
pub struct HandledProblem {
    p: ProblemAt,
    pub action: String,
}

/// A problem in a definition file, with position information.
#[derive(thiserror::Error, Debug)]
#[error("{p} (line {at})")]
pub struct ProblemAt {
    p: Problem,
    at: TextPos,
}

/// A kind of problem in a definition file.
#[derive(thiserror::Error, Debug)]
pub enum Problem {
    #[error("missing node '{missing}' as child of '{parent}'")]
    XmlNodeMissing { missing: String, parent: String },
    #[error("missing attribute '{attr}' on <{tag}>")]
    XmlAttributeMissing { attr: String, tag: String },
    #[error(
        "could not parse attribute {attr}=\"{content}\" on <{tag}> as {expected_type}; {source}"
    )]
    InvalidAttribute {
        attr: String,
        tag: String,
        content: String,
        source: Box<dyn std::error::Error + Send + Sync>,
        expected_type: String,
    },
    #[error("could not parse content \"{content}\" of <{tag}> as {expected_type}; {source}")]
    InvalidText {
        tag: String,
        content: String,
        source: Box<dyn std::error::Error + Send + Sync>,
        expected_type: String,
    },
    #[error("{field} of <{tag}> must not be empty")]
    EmptyValue { field: String, tag: String },
    #[error("unexpected node <{0}>")]
    UnexpectedXmlNode(String),
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: EntityKind, name: Name },
}

impl Problem {
    /// Add position information to problem based on Node where it occured.
    pub(crate) fn at(self, node: &Node) -> ProblemAt {
        ProblemAt {
            p: self,
            at: position(node),
        }
    }
}

pub(crate) fn position(node: &Node) -> TextPos {
    node.document().text_pos_at(node.range().start)
}

/// Access to the list handled problems are pushed onto.
pub(crate) trait ProblemsMut {
    fn problems_mut(&mut self) -> &mut Problems;
}

impl ProblemsMut for Problems {
    fn problems_mut(&mut self) -> &mut Problems {
        self
    }
}

impl ProblemAt {
    /// Specify what action was taken to resolve the problem and then push it
    /// onto the problems.
    pub(crate) fn handled_by<T: Into<String>>(self, action: T, problems: &mut impl ProblemsMut) {
        let action = action.into();
        tracing::debug!("{self}; {action}");
        problems.problems_mut().push(HandledProblem { p: self, action });
    }

    pub fn problem(&self) -> &Problem {
        &self.p
    }

    pub fn at(&self) -> TextPos {
        self.at
    }
}

pub(crate) trait HandleProblem<T, S: Into<String>> {
    fn ok_or_handled_by(self, action: S, problems: &mut impl ProblemsMut) -> Option<T>;
}

impl<T, S: Into<String>> HandleProblem<T, S> for Result<T, ProblemAt> {
    /// Specify what action will be taken to resolve a possible Err(Problem),
    /// push it onto problems and return None. If the result is Ok(v), Some(v)
    /// is returned instead.
    fn ok_or_handled_by(self, action: S, problems: &mut impl ProblemsMut) -> Option<T> {
        match self {
            Ok(t) => Some(t),
            Err(p) => {
                p.handled_by(action, problems);
                None
            }
        }
    }
}

/// Parsing into a field that already holds its default value.
pub(crate) trait KeepDefault<T> {
    /// Assigns an Ok value to `to`. A problem is handled by leaving `to` as
    /// it is.
    fn assign_or_keep(self, to: &mut T, problems: &mut impl ProblemsMut);
}

impl<T: Display> KeepDefault<T> for Result<T, ProblemAt> {
    fn assign_or_keep(self, to: &mut T, problems: &mut impl ProblemsMut) {
        match self {
            Ok(value) => *to = value,
            Err(p) => p.handled_by(format!("using default {to}"), problems),
        }
    }
}

impl HandledProblem {
    pub fn problem(&self) -> &Problem {
        self.p.problem()
    }

    pub fn at(&self) -> TextPos {
        self.p.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_of_error_handling_in_parser() {
        let mut problems = Problems::new();

        let binding = roxmltree::Document::parse(r#"<whatsThis />"#).unwrap();
        let node = binding.root_element();

        Problem::UnexpectedXmlNode("whatsThis".into())
            .at(&node)
            .handled_by("ignoring node", &mut problems);

        assert!(matches!(
            &problems[0],
            HandledProblem {
                action,
                p: ProblemAt {
                    at,
                    p: Problem::UnexpectedXmlNode(..)
                }
            } if action == "ignoring node" && at == &TextPos{row: 1, col: 1}
        ));
        assert_eq!(
            problems[0].to_string(),
            "unexpected node <whatsThis> (line 1:1); ignoring node"
        );
    }

    #[test]
    fn problems_keep_the_default() {
        let mut problems = Problems::new();
        let doc = roxmltree::Document::parse(r#"<Type>Disco Ball</Type>"#).unwrap();
        let mut kind = String::from("Other");

        let bad: Result<String, ProblemAt> = Err(Problem::InvalidText {
            tag: "Type".into(),
            content: "Disco Ball".into(),
            source: "unknown fixture type".into(),
            expected_type: "FixtureType".into(),
        }
        .at(&doc.root_element()));
        bad.assign_or_keep(&mut kind, &mut problems);
        assert_eq!(kind, "Other");
        assert_eq!(problems[0].action, "using default Other");

        Ok::<_, ProblemAt>("Dimmer".to_string()).assign_or_keep(&mut kind, &mut problems);
        assert_eq!(kind, "Dimmer");
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn ok_values_pass_through() {
        let mut problems = Problems::new();
        let ok: Result<u8, ProblemAt> = Ok(3);
        assert_eq!(ok.ok_or_handled_by("unused", &mut problems), Some(3));
        assert!(problems.is_empty());
    }
}
