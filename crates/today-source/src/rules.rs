//! Summary-based include, exclude and rewrite rules.
//!
//! Rules run between parsing and rendering. The rendering pipeline never
//! learns whether any rules were configured.

use regex::Regex;
use serde::{Deserialize, Serialize};
use today_core::CalendarEvent;
use tracing::{debug, trace};

use crate::error::{SourceError, SourceResult};

/// One summary rewrite as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteConfig {
    pub pattern: String,
    pub replacement: String,
}

/// The `[rules]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Keep only events whose summary matches one of these.
    pub include: Vec<String>,
    /// Drop events whose summary matches any of these.
    pub exclude: Vec<String>,
    /// Applied in order to the summaries of kept events.
    pub rewrite: Vec<RewriteConfig>,
}

#[derive(Debug, Clone)]
struct Rewrite {
    pattern: Regex,
    replacement: String,
}

/// Compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    rewrite: Vec<Rewrite>,
}

impl RuleSet {
    /// Compiles every pattern, failing on the first invalid one.
    pub fn compile(config: &RuleConfig) -> SourceResult<Self> {
        let rules = Self {
            include: compile_all(&config.include)?,
            exclude: compile_all(&config.exclude)?,
            rewrite: config
                .rewrite
                .iter()
                .map(|rule| {
                    Ok(Rewrite {
                        pattern: compile(&rule.pattern)?,
                        replacement: rule.replacement.clone(),
                    })
                })
                .collect::<SourceResult<_>>()?,
        };
        debug!(
            include = rules.include.len(),
            exclude = rules.exclude.len(),
            rewrite = rules.rewrite.len(),
            "Compiled rules"
        );
        Ok(rules)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.rewrite.is_empty()
    }

    /// Filters and rewrites `events` in place.
    pub fn apply(&self, events: &mut Vec<CalendarEvent>) {
        if self.is_empty() {
            return;
        }

        events.retain(|event| {
            let keep = self.keeps(&event.summary);
            if !keep {
                trace!(summary = %event.summary, "Event removed by rules");
            }
            keep
        });

        for event in events.iter_mut() {
            for rule in &self.rewrite {
                event.summary = rule
                    .pattern
                    .replace_all(&event.summary, rule.replacement.as_str())
                    .into_owned();
            }
        }
    }

    fn keeps(&self, summary: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(summary)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(summary))
    }
}

fn compile(pattern: &str) -> SourceResult<Regex> {
    Regex::new(pattern).map_err(|source| SourceError::Rule {
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_all(patterns: &[String]) -> SourceResult<Vec<Regex>> {
    patterns.iter().map(|p| compile(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn at(h: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, 0, 0).unwrap().fixed_offset()
    }

    fn events() -> Vec<CalendarEvent> {
        vec![
            CalendarEvent::new("Lecture: Algorithms", at(9), at(10)),
            CalendarEvent::new("Lab: Algorithms", at(10), at(12)),
            CalendarEvent::new("Lecture: Databases", at(13), at(14)),
            CalendarEvent::new("Lunch", at(12), at(13)),
        ]
    }

    fn summaries(events: &[CalendarEvent]) -> Vec<&str> {
        events.iter().map(|e| e.summary.as_str()).collect()
    }

    mod filtering {
        use super::*;

        #[test]
        fn exclude_removes_matches() {
            let rules = RuleSet::compile(&RuleConfig {
                exclude: vec!["^Lab".into()],
                ..Default::default()
            })
            .unwrap();
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(
                summaries(&events),
                vec!["Lecture: Algorithms", "Lecture: Databases", "Lunch"]
            );
        }

        #[test]
        fn include_keeps_only_matches() {
            let rules = RuleSet::compile(&RuleConfig {
                include: vec!["Algorithms".into(), "^Lunch$".into()],
                ..Default::default()
            })
            .unwrap();
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(
                summaries(&events),
                vec!["Lecture: Algorithms", "Lab: Algorithms", "Lunch"]
            );
        }

        #[test]
        fn exclude_wins_over_include() {
            let rules = RuleSet::compile(&RuleConfig {
                include: vec!["Algorithms".into()],
                exclude: vec!["^Lab".into()],
                ..Default::default()
            })
            .unwrap();
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(summaries(&events), vec!["Lecture: Algorithms"]);
        }

        #[test]
        fn empty_rules_keep_everything() {
            let rules = RuleSet::compile(&RuleConfig::default()).unwrap();
            assert!(rules.is_empty());
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(events.len(), 4);
        }
    }

    mod rewriting {
        use super::*;

        #[test]
        fn rewrites_in_order() {
            let rules = RuleSet::compile(&RuleConfig {
                rewrite: vec![
                    RewriteConfig {
                        pattern: r"^Lecture: (.+)$".into(),
                        replacement: "$1".into(),
                    },
                    RewriteConfig {
                        pattern: "Algorithms".into(),
                        replacement: "Algo".into(),
                    },
                ],
                ..Default::default()
            })
            .unwrap();
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(
                summaries(&events),
                vec!["Algo", "Lab: Algo", "Databases", "Lunch"]
            );
        }

        #[test]
        fn rewrite_keeps_times() {
            let rules = RuleSet::compile(&RuleConfig {
                rewrite: vec![RewriteConfig {
                    pattern: "Lunch".into(),
                    replacement: "Break".into(),
                }],
                ..Default::default()
            })
            .unwrap();
            let mut events = events();
            rules.apply(&mut events);
            assert_eq!(events[3].summary, "Break");
            assert_eq!(events[3].start, Some(at(12)));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn invalid_pattern_is_error() {
            let err = RuleSet::compile(&RuleConfig {
                exclude: vec!["(unclosed".into()],
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(err, SourceError::Rule { ref pattern, .. } if pattern == "(unclosed"));
            assert!(err.to_string().starts_with("invalid rule pattern '(unclosed'"));
        }

        #[test]
        fn deserializes_from_json() {
            let config: RuleConfig = serde_json::from_str(
                r#"{"exclude": ["^Lab"], "rewrite": [{"pattern": "a", "replacement": "b"}]}"#,
            )
            .unwrap();
            assert!(config.include.is_empty());
            assert_eq!(config.exclude, vec!["^Lab".to_string()]);
            assert_eq!(config.rewrite[0].replacement, "b");
        }
    }
}
