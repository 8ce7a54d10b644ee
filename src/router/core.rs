//! Pattern recognition - the path matching engine behind route dispatch.
//!
//! Patterns are compiled once at startup into anchored regular expressions.
//! Recognition walks the compiled list in specificity order and returns the
//! first pattern that matches along with its extracted parameters.

use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Maximum number of route parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` since they come from the compiled pattern and are
/// shared by every match; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Name given to the capture of a trailing `*` segment.
pub const SPLAT_PARAM: &str = "splat";

/// Parameters extracted from a matched path, in pattern order.
///
/// Handlers can read them by name or by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(ParamVec);

impl RouteParams {
    #[must_use]
    pub fn new(params: ParamVec) -> Self {
        Self(params)
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics when a name appears more than once in
    /// the pattern.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a parameter by its position in the pattern.
    #[inline]
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters as a JSON object, convenient as template data.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<Arc<str>>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A successful recognition: which pattern matched and what it captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// The registered pattern string, used as the route table key
    pub pattern: Arc<str>,
    /// Parameters captured from the path
    pub params: RouteParams,
}

/// The path matching engine consumed by the dispatcher.
///
/// Implementations own the matching semantics (precedence, parameter syntax,
/// decoding); the dispatcher only needs the matched pattern and its params.
pub trait PatternRouter: Send + Sync {
    fn recognize(&self, path: &str) -> Option<PatternMatch>;
}

struct CompiledPattern {
    pattern: Arc<str>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    literal_segments: usize,
}

/// Regex-backed [`PatternRouter`].
///
/// Supported segment syntax:
/// - `:name` or `{name}` - captures one path segment
/// - `*` - as the last segment, captures the remainder of the path as `splat`
/// - anything else matches literally
///
/// Patterns with more literal segments are tried first, then longer patterns,
/// so `/widgets/new` wins over `/widgets/:id`.
pub struct PathRouter {
    routes: Vec<CompiledPattern>,
}

impl PathRouter {
    /// Compile the given patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when a pattern has an empty
    /// parameter name, a non-trailing `*`, or does not compile.
    pub fn new<'a, I>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut routes = patterns
            .into_iter()
            .map(|pattern| {
                let (regex, param_names, literal_segments) = Self::path_to_regex(pattern)?;
                Ok(CompiledPattern {
                    pattern: Arc::from(pattern),
                    regex,
                    param_names,
                    literal_segments,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        routes.sort_by(|a, b| {
            b.literal_segments
                .cmp(&a.literal_segments)
                .then_with(|| b.pattern.len().cmp(&a.pattern.len()))
        });

        info!(routes_count = routes.len(), "Pattern table compiled");
        Ok(Self { routes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub(crate) fn path_to_regex(
        pattern: &str,
    ) -> Result<(Regex, Vec<Arc<str>>, usize), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            let regex = Regex::new(r"^/$").map_err(|e| invalid(&e.to_string()))?;
            return Ok((regex, Vec::new(), 0));
        }

        let mut regex_src = String::with_capacity(pattern.len() + 16);
        regex_src.push('^');
        let mut param_names = Vec::with_capacity(segments.len());
        let mut literal_segments = 0;

        for (i, segment) in segments.iter().enumerate() {
            let braced = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'));
            if let Some(name) = segment.strip_prefix(':').or(braced) {
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                regex_src.push_str("/([^/]+)");
                param_names.push(Arc::from(name));
            } else if *segment == "*" {
                if i + 1 != segments.len() {
                    return Err(invalid("'*' must be the last segment"));
                }
                regex_src.push_str("/(.*)");
                param_names.push(Arc::from(SPLAT_PARAM));
            } else {
                regex_src.push('/');
                regex_src.push_str(&regex::escape(segment));
                literal_segments += 1;
            }
        }
        regex_src.push('$');

        let regex = Regex::new(&regex_src).map_err(|e| invalid(&e.to_string()))?;
        Ok((regex, param_names, literal_segments))
    }
}

/// Drop the query string and fragment; an empty path means `/`.
fn strip_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    match &path[..end] {
        "" => "/",
        p => p,
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .unwrap_or(Cow::Borrowed(value))
        .into_owned()
}

impl PatternRouter for PathRouter {
    fn recognize(&self, path: &str) -> Option<PatternMatch> {
        let path = strip_path(path);
        for route in &self.routes {
            if let Some(captures) = route.regex.captures(path) {
                let mut params = ParamVec::new();
                for (i, name) in route.param_names.iter().enumerate() {
                    if let Some(val) = captures.get(i + 1) {
                        params.push((Arc::clone(name), decode(val.as_str())));
                    }
                }
                debug!(path = %path, pattern = %route.pattern, "Pattern matched");
                return Some(PatternMatch {
                    pattern: Arc::clone(&route.pattern),
                    params: RouteParams::new(params),
                });
            }
        }
        debug!(path = %path, "No pattern matched");
        None
    }
}
