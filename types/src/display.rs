//! Presentation-agnostic result building blocks.
//!
//! These types are the vocabulary shared between analysis modules (which
//! produce them) and whatever presentation layer eventually renders them.
//! Nothing in here knows how to draw itself.

use serde::{Deserialize, Serialize};

/// How the presentation layer should initially show a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Expanded by default.
    Full,
    /// Shown as a collapsible section, collapsed by default.
    #[default]
    Collapsible,
    /// Present in the payload but not rendered unless explicitly requested.
    Hidden,
}

/// Severity ladder for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Medium,
    Major,
}

/// Threshold ladder mapping a measured value to a severity.
///
/// Thresholds are checked highest-first; the first one the value meets wins.
/// A value below every threshold maps to no severity at all, which callers
/// should treat as "don't bother suggesting anything".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityTiers {
    /// `(threshold, severity)` pairs, ascending by threshold.
    pub tiers: Vec<(i64, Severity)>,
}

impl SeverityTiers {
    pub fn new(mut tiers: Vec<(i64, Severity)>) -> Self {
        tiers.sort_by_key(|(threshold, _)| *threshold);
        Self { tiers }
    }

    /// Map a measured value to a severity, or `None` if it sits below every tier.
    pub fn rate(&self, value: i64) -> Option<Severity> {
        self.tiers
            .iter()
            .rev()
            .find(|(threshold, _)| value >= *threshold)
            .map(|(_, severity)| *severity)
    }
}

/// A single actionable suggestion produced by an analysis module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Handle of the module that raised it.
    pub module: String,
    /// What the player should do differently.
    pub content: String,
    /// The measurement that justifies the suggestion.
    pub why: String,
    pub severity: Severity,
}

/// One measured requirement inside a checklist rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRequirement {
    pub name: String,
    /// Measured value in percent, 0.0–100.0.
    pub percent: f64,
}

/// A pass/fail rule shown in the run checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRule {
    /// Handle of the module that declared it.
    pub module: String,
    pub name: String,
    pub description: String,
    /// Percent the rule must reach to count as passed.
    pub target: f64,
    pub requirements: Vec<ChecklistRequirement>,
}

impl ChecklistRule {
    /// Overall percent for the rule: the mean of its requirement percents.
    pub fn percent(&self) -> f64 {
        if self.requirements.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.requirements.iter().map(|r| r.percent).sum();
        sum / self.requirements.len() as f64
    }

    pub fn passed(&self) -> bool {
        self.percent() >= self.target
    }
}
