//! Path pattern matching.
//!
//! # Design Decisions
//! - Patterns are compared segment by segment, no regex
//! - `:name` segments bind a parameter; a final `*` binds the rest of the path
//! - Empty segments are ignored, so `/version/` matches `/version`
//! - Surplus request segments fail the match unless the pattern ends in `*`

use std::collections::HashMap;

use thiserror::Error;

/// A route pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    NotAbsolute(String),
    #[error("pattern '{0}' has a wildcard before its last segment")]
    WildcardNotLast(String),
    #[error("pattern '{0}' has a parameter without a name")]
    UnnamedParam(String),
    #[error("pattern '{pattern}' binds '{name}' twice")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// Parameters bound by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    named: HashMap<String, String>,
    wildcard: Option<String>,
}

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    /// The remainder captured by a trailing `*`, without a leading slash.
    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let raw: Vec<&str> = split_segments(pattern).collect();
        let mut segments = Vec::with_capacity(raw.len());
        for (i, seg) in raw.iter().enumerate() {
            let segment = if *seg == "*" {
                if i + 1 != raw.len() {
                    return Err(PatternError::WildcardNotLast(pattern.to_string()));
                }
                Segment::Wildcard
            } else if let Some(name) = seg.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::UnnamedParam(pattern.to_string()));
                }
                if segments.contains(&Segment::Param(name.to_string())) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Literal((*seg).to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a request path, returning the bound parameters.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let mut params = RouteParams::default();
        let mut parts = split_segments(path);

        for segment in &self.segments {
            match segment {
                Segment::Wildcard => {
                    let rest: Vec<&str> = parts.by_ref().collect();
                    params.wildcard = Some(rest.join("/"));
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    if parts.next()? != literal {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.next()?;
                    params.named.insert(name.clone(), value.to_string());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
