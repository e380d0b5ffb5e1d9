//! Ignore rules for closed focus sessions.
//!
//! A rule is a regular expression searched (not anchored) against the app name
//! and the title of the session being closed. Suppressed events are dropped
//! before they reach the data file; the tracker has already moved on by then.

use regex::Regex;
use thiserror::Error;

use crate::types::WindowEvent;

/// Errors building an [`EventFilter`].
#[derive(Debug, Error)]
pub enum FilterError {
    /// A pattern failed to compile.
    #[error("invalid ignore pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct IgnoreRule(Regex);

impl IgnoreRule {
    /// Compiles a single pattern.
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| FilterError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns `true` if the pattern occurs in the event's app name or title.
    pub fn is_match(&self, event: &WindowEvent) -> bool {
        self.0.is_match(&event.appname) || self.0.is_match(&event.title)
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// The set of ignore rules, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    rules: Vec<IgnoreRule>,
}

impl EventFilter {
    /// Compiles every pattern, failing on the first invalid one.
    pub fn compile<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| IgnoreRule::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Returns the first rule matching `event`, if any.
    pub fn matching_rule(&self, event: &WindowEvent) -> Option<&IgnoreRule> {
        self.rules.iter().find(|rule| rule.is_match(event))
    }

    /// Returns `true` if `event` should not be written.
    pub fn should_suppress(&self, event: &WindowEvent) -> bool {
        self.matching_rule(event).is_some()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(appname: &str, title: &str) -> WindowEvent {
        WindowEvent {
            started_at: 0,
            duration: 1,
            appname: appname.into(),
            title: title.into(),
        }
    }

    #[test]
    fn test_empty_filter_suppresses_nothing() {
        let filter = EventFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.should_suppress(&event("anything", "at all")));
    }

    #[test]
    fn test_matches_appname_or_title() {
        let filter = EventFilter::compile(["^keepassxc$", "(?i)private browsing"]).unwrap();
        assert_eq!(filter.len(), 2);

        assert!(filter.should_suppress(&event("keepassxc", "Passwords.kdbx")));
        assert!(filter.should_suppress(&event("firefox", "Mozilla Firefox Private Browsing")));
        assert!(!filter.should_suppress(&event("firefox", "Inbox")));
    }

    #[test]
    fn test_pattern_is_searched_not_anchored() {
        let filter = EventFilter::compile(["B"]).unwrap();
        assert!(filter.should_suppress(&event("xBx", "y")));
        assert!(!filter.should_suppress(&event("A", "x")));
    }

    #[test]
    fn test_first_matching_rule_is_reported() {
        let filter = EventFilter::compile(["slack", "a"]).unwrap();
        let rule = filter.matching_rule(&event("slack", "general")).unwrap();
        assert_eq!(rule.as_str(), "slack");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = EventFilter::compile(["ok", "(unclosed"]).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }
}
