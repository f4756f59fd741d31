//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile `/literal/:name/:name2(expr)` templates into a regex matcher
//! - Record parameter names in declaration order (position -> name)
//! - Match request paths with full-span anchoring
//!
//! # Design Decisions
//! - Patterns compile once at registration time, immutable afterwards
//! - A named segment without an explicit sub-pattern captures `[^/]+`
//! - An explicit parenthesized sub-pattern replaces the default capture
//! - A match is only accepted when it spans the entire path; a partial
//!   match reported by the regex engine is rejected

use regex::Regex;

use crate::error::RegistrationError;

/// Default capture for a `:name` segment: one or more non-slash characters.
const DEFAULT_CAPTURE: &str = "([^/]+)";

/// A compiled route pattern.
///
/// Parameter values are positional. Duplicate parameter names are allowed;
/// when they collide the last position wins. That quirk is kept on purpose
/// so existing route tables keep their observable behavior.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    regex: Regex,
    params: Vec<String>,
}

impl Pattern {
    /// Compile a path template into a matcher plus its parameter names.
    pub fn compile(pattern: &str) -> Result<Self, RegistrationError> {
        if !pattern.starts_with('/') {
            return Err(RegistrationError::PatternNotRooted(pattern.to_string()));
        }

        let mut params = Vec::new();
        let mut parts = Vec::new();
        for segment in pattern.split('/') {
            match segment.strip_prefix(':') {
                Some(named) => match named.find('(') {
                    Some(open) => {
                        params.push(named[..open].to_string());
                        parts.push(named[open..].to_string());
                    }
                    None => {
                        params.push(named.to_string());
                        parts.push(DEFAULT_CAPTURE.to_string());
                    }
                },
                None => parts.push(segment.to_string()),
            }
        }

        let assembled = parts.join("/");
        let regex = Regex::new(&assembled).map_err(|source| RegistrationError::InvalidCapture {
            pattern: pattern.to_string(),
            source: Box::new(source),
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
            params,
        })
    }

    /// The original template this pattern was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// Whether `path` matches this pattern in full.
    pub fn matches(&self, path: &str) -> bool {
        self.captures(path).is_some()
    }

    /// Capture values for `path`, in declaration order.
    ///
    /// Returns `None` unless the match covers the whole path. The regex
    /// engine reports the leftmost match, so a prefix or interior match
    /// shows up here as a shorter span and is rejected.
    pub fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(path)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != path.len() {
            return None;
        }
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = Pattern::compile("/users").unwrap();
        assert!(pattern.matches("/users"));
        assert!(!pattern.matches("/users/42"));
        assert!(pattern.param_names().is_empty());
    }

    #[test]
    fn test_default_capture() {
        let pattern = Pattern::compile("/users/:id").unwrap();
        assert_eq!(pattern.param_names(), ["id"]);
        assert_eq!(pattern.captures("/users/42"), Some(vec!["42".to_string()]));
        assert!(pattern.matches("/users/alice"));
        assert!(!pattern.matches("/users/"));
        assert!(!pattern.matches("/users/42/extra"));
    }

    #[test]
    fn test_explicit_capture() {
        let pattern = Pattern::compile("/users/:id([0-9]+)").unwrap();
        assert_eq!(pattern.captures("/users/42"), Some(vec!["42".to_string()]));
        assert!(!pattern.matches("/users/alice"));
    }

    #[test]
    fn test_multiple_params_in_order() {
        let pattern = Pattern::compile("/orgs/:org/repos/:repo").unwrap();
        assert_eq!(pattern.param_names(), ["org", "repo"]);
        assert_eq!(
            pattern.captures("/orgs/acme/repos/widget"),
            Some(vec!["acme".to_string(), "widget".to_string()])
        );
    }

    #[test]
    fn test_anchoring_rejects_prefix_and_interior_matches() {
        let pattern = Pattern::compile("/users/:id").unwrap();
        // Prefix of the path matches the pattern but the tail is left over.
        assert!(!pattern.matches("/users/42/extra"));
        // The pattern occurs in the interior of the path.
        assert!(!pattern.matches("/v1/users/42"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = Pattern::compile("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/users"));
    }

    #[test]
    fn test_rejects_unrooted_pattern() {
        assert!(matches!(
            Pattern::compile("users/:id"),
            Err(RegistrationError::PatternNotRooted(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_capture() {
        assert!(matches!(
            Pattern::compile("/users/:id([0-9+)"),
            Err(RegistrationError::InvalidCapture { .. })
        ));
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let pattern = Pattern::compile("/files/").unwrap();
        assert!(pattern.matches("/files/"));
        assert!(!pattern.matches("/files"));
    }
}
