use std::{cmp::Ordering, collections::HashMap};

use crate::models::{CapabilitySet, PageId, RouteManifestEntry};

/// RouteTableError
///
/// Raised while building the table. The table is static, so any of these is a startup bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("route pattern `{pattern}` overlaps `{existing}` with the same shape")]
    DuplicatePattern { pattern: String, existing: String },

    #[error("gated route `{pattern}` has an empty capability set")]
    EmptyCapabilitySet { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// PathPattern
///
/// A parsed route pattern such as `/reset-password/:token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, RouteTableError> {
        if !raw.starts_with('/') {
            return Err(RouteTableError::InvalidPattern {
                pattern: raw.to_string(),
                reason: "patterns must start with `/`".to_string(),
            });
        }

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|part| !part.is_empty()) {
            match part.strip_prefix(':') {
                Some("") => {
                    return Err(RouteTableError::InvalidPattern {
                        pattern: raw.to_string(),
                        reason: "parameter segment without a name".to_string(),
                    });
                }
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Two patterns have the same shape when they would match exactly the same paths.
    fn same_shape(&self, other: &PathPattern) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Param(_), Segment::Param(_)) => true,
                    _ => false,
                })
    }

    /// Orders by specificity: at the first position where one pattern has a literal and the
    /// other a parameter, the literal wins. `Greater` means `self` is more specific.
    fn specificity_cmp(&self, other: &PathPattern) -> Ordering {
        for pair in self.segments.iter().zip(&other.segments) {
            match pair {
                (Segment::Literal(_), Segment::Param(_)) => return Ordering::Greater,
                (Segment::Param(_), Segment::Literal(_)) => return Ordering::Less,
                _ => {}
            }
        }
        Ordering::Equal
    }

    fn capture(&self, path_segments: &[&str]) -> Option<RouteParams> {
        if self.segments.len() != path_segments.len() {
            return None;
        }

        let mut params = RouteParams::default();
        for (segment, actual) in self.segments.iter().zip(path_segments) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = urlencoding::decode(actual)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| actual.to_string());
                    params.0.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }
}

/// RouteParams
///
/// Values bound to named parameter segments during a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// RouteDescriptor
///
/// A static table entry. `capabilities` is `None` for public routes; gated routes always
/// carry a non-empty set (enforced by `RouteTableBuilder::build`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub pattern: String,
    pub page: PageId,
    pub capabilities: Option<CapabilitySet>,
}

impl RouteDescriptor {
    pub fn public(pattern: &str, page: PageId) -> Self {
        Self {
            pattern: pattern.to_string(),
            page,
            capabilities: None,
        }
    }

    pub fn gated(pattern: &str, page: PageId, capabilities: impl Into<CapabilitySet>) -> Self {
        Self {
            pattern: pattern.to_string(),
            page,
            capabilities: Some(capabilities.into()),
        }
    }

    pub fn is_public(&self) -> bool {
        self.capabilities.is_none()
    }
}

/// RouteMatch
///
/// A successful lookup: the winning descriptor and the captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub descriptor: &'a RouteDescriptor,
    pub params: RouteParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResolution<'a> {
    Matched(RouteMatch<'a>),
    /// No descriptor matched; carries the table's fallback page.
    Fallback(PageId),
}

/// RouteTable
///
/// Immutable after `build`. Lookup is a linear scan with a specificity tie-break, which is
/// plenty for a hand-written table of a dozen entries.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(PathPattern, RouteDescriptor)>,
    fallback: PageId,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn fallback(&self) -> PageId {
        self.fallback
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.entries.iter().map(|(_, descriptor)| descriptor)
    }

    /// resolve
    ///
    /// Normalizes `path` and returns the most specific matching descriptor, or the fallback.
    pub fn resolve(&self, path: &str) -> RouteResolution<'_> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let mut best: Option<(&PathPattern, RouteMatch<'_>)> = None;
        for (pattern, descriptor) in &self.entries {
            let Some(params) = pattern.capture(&segments) else {
                continue;
            };
            let more_specific = match &best {
                Some((current, _)) => pattern.specificity_cmp(current) == Ordering::Greater,
                None => true,
            };
            if more_specific {
                best = Some((pattern, RouteMatch { descriptor, params }));
            }
        }

        match best {
            Some((_, matched)) => RouteResolution::Matched(matched),
            None => RouteResolution::Fallback(self.fallback),
        }
    }

    pub fn manifest(&self) -> Vec<RouteManifestEntry> {
        self.descriptors()
            .map(|descriptor| RouteManifestEntry {
                pattern: descriptor.pattern.clone(),
                page: descriptor.page,
                public: descriptor.is_public(),
                required_roles: descriptor
                    .capabilities
                    .map(|caps| caps.to_vec())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// RouteTableBuilder
///
/// Collects descriptors group by group and validates them on `build`.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    descriptors: Vec<RouteDescriptor>,
    fallback: Option<PageId>,
}

impl RouteTableBuilder {
    pub fn routes(mut self, group: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        self.descriptors.extend(group);
        self
    }

    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn fallback(mut self, page: PageId) -> Self {
        self.fallback = Some(page);
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let mut entries: Vec<(PathPattern, RouteDescriptor)> =
            Vec::with_capacity(self.descriptors.len());

        for descriptor in self.descriptors {
            if descriptor.capabilities.is_some_and(|caps| caps.is_empty()) {
                return Err(RouteTableError::EmptyCapabilitySet {
                    pattern: descriptor.pattern,
                });
            }

            let pattern = PathPattern::parse(&descriptor.pattern)?;
            if let Some((existing, _)) = entries.iter().find(|(p, _)| p.same_shape(&pattern)) {
                return Err(RouteTableError::DuplicatePattern {
                    pattern: descriptor.pattern,
                    existing: existing.as_str().to_string(),
                });
            }
            entries.push((pattern, descriptor));
        }

        Ok(RouteTable {
            entries,
            fallback: self.fallback.unwrap_or(PageId::NotFound),
        })
    }
}

/// normalize_path
///
/// Strips the query string and fragment, collapses repeated slashes and drops the trailing
/// slash. Always returns a path starting with `/`; the root normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}
