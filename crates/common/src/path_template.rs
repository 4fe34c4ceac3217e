//! `google.api.http` path templates
//!
//! ```text
//! Template = "/" Segments [ ":" Verb ] ;
//! Segments = Segment { "/" Segment } ;
//! Segment  = "*" | "**" | LITERAL | Variable ;
//! Variable = "{" FieldPath [ "=" Segments ] "}" ;
//! ```

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed HTTP path template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTemplate {
    pub segments: Vec<PathSegment>,
    /// Custom method suffix, e.g. `exportData` in `/v1/{name}:exportData`
    pub verb: Option<String>,
}

/// A literal path segment or a variable bound to a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    Literal(String),
    Variable(PathVariable),
}

/// A variable segment such as `{name=projects/*/secrets/*}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathVariable {
    /// Request field path, e.g. `["parent", "project"]` for `{parent.project}`
    pub field_path: Vec<String>,
    /// Matched segments: literals, `*` or `**`
    pub segments: Vec<String>,
}

impl PathVariable {
    pub fn new<I, S>(field_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_path: field_path.into_iter().map(Into::into).collect(),
            segments: vec!["*".to_string()],
        }
    }

    pub fn with_segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = segments.into_iter().map(Into::into).collect();
        self
    }

    /// The variable matches a single path segment (`{project}` or `{project=*}`)
    pub fn is_single_segment(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == "*"
    }

    /// Dotted field path, e.g. "parent.project"
    pub fn field_name(&self) -> String {
        self.field_path.join(".")
    }
}

impl PathTemplate {
    /// Parse an HTTP rule path such as `/v1/{name=projects/*/secrets/*}:access`
    pub fn parse(template: &str) -> Result<Self> {
        let err = |reason: String| GeneratorError::PathTemplate {
            template: template.to_string(),
            reason,
        };
        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| err("must start with '/'".to_string()))?;
        let (path, verb) = split_verb(rest).map_err(err)?;
        let segments = parse_segments(path).map_err(err)?;
        Ok(Self { segments, verb })
    }

    /// Parse a resource pattern such as `projects/{project}/secrets/{secret}`
    pub fn parse_pattern(pattern: &str) -> Result<Vec<PathSegment>> {
        parse_segments(pattern).map_err(|reason| GeneratorError::PathTemplate {
            template: pattern.to_string(),
            reason,
        })
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_literal(mut self, literal: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Literal(literal.into()));
        self
    }

    pub fn with_variable(mut self, variable: PathVariable) -> Self {
        self.segments.push(PathSegment::Variable(variable));
        self
    }

    /// Append a single-segment variable bound to a top-level field
    pub fn with_variable_named(self, field: impl Into<String>) -> Self {
        self.with_variable(PathVariable::new([field.into()]))
    }

    pub fn variables(&self) -> impl Iterator<Item = &PathVariable> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Variable(v) => Some(v),
            PathSegment::Literal(_) => None,
        })
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Literal(literal) => write!(f, "{}", literal),
            PathSegment::Variable(variable) if variable.is_single_segment() => {
                write!(f, "{{{}}}", variable.field_name())
            }
            PathSegment::Variable(variable) => write!(
                f,
                "{{{}={}}}",
                variable.field_name(),
                variable.segments.join("/")
            ),
        }
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        if let Some(verb) = &self.verb {
            write!(f, ":{}", verb)?;
        }
        Ok(())
    }
}

/// Split the trailing `:verb`, which may only appear outside variables
fn split_verb(path: &str) -> std::result::Result<(&str, Option<String>), String> {
    let mut depth = 0usize;
    for (i, ch) in path.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced '}'".to_string())?
            }
            ':' if depth == 0 => {
                let verb = &path[i + 1..];
                if verb.is_empty() || verb.contains(['/', '{', '}', ':']) {
                    return Err(format!("invalid verb {:?}", verb));
                }
                return Ok((&path[..i], Some(verb.to_string())));
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unterminated variable".to_string());
    }
    Ok((path, None))
}

fn parse_segments(path: &str) -> std::result::Result<Vec<PathSegment>, String> {
    split_top_level(path)?
        .into_iter()
        .map(parse_segment)
        .collect()
}

/// Split on '/' outside of braces
fn split_top_level(path: &str) -> std::result::Result<Vec<&str>, String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in path.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced '}'".to_string())?
            }
            '/' if depth == 0 => {
                pieces.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unterminated variable".to_string());
    }
    pieces.push(&path[start..]);
    Ok(pieces)
}

fn parse_segment(piece: &str) -> std::result::Result<PathSegment, String> {
    if piece.is_empty() {
        return Err("empty segment".to_string());
    }
    let Some(inner) = piece.strip_prefix('{') else {
        if piece.contains(['{', '}']) {
            return Err(format!("malformed segment {:?}", piece));
        }
        return Ok(PathSegment::Literal(piece.to_string()));
    };
    let inner = inner
        .strip_suffix('}')
        .ok_or_else(|| format!("malformed variable {:?}", piece))?;
    let (field_path, pattern) = match inner.split_once('=') {
        Some((field_path, pattern)) => (field_path, Some(pattern)),
        None => (inner, None),
    };
    let field_path: Vec<String> = field_path.split('.').map(str::to_string).collect();
    let valid_identifier =
        |s: &String| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !field_path.iter().all(valid_identifier) {
        return Err(format!("invalid field path in {:?}", piece));
    }
    let segments = match pattern {
        Some(pattern) => {
            let segments: Vec<String> = pattern.split('/').map(str::to_string).collect();
            if segments.iter().any(|s| s.is_empty() || s.contains(['{', '}'])) {
                return Err(format!("invalid variable pattern in {:?}", piece));
            }
            segments
        }
        None => vec!["*".to_string()],
    };
    Ok(PathSegment::Variable(PathVariable {
        field_path,
        segments,
    }))
}
