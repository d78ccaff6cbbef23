//! Module results and the per-run result board.

use serde::{Deserialize, Serialize};
use serde_json::json;
use vigil_types::{ChecklistRule, DisplayMode, Suggestion};

/// Well-known ordering keys for result display.
///
/// Results are sorted by `order` ascending; modules that don't care use
/// `DEFAULT`. The checklist and suggestion boards always sort above
/// module-specific results.
pub mod display_order {
    pub const CHECKLIST: i32 = -2;
    pub const SUGGESTIONS: i32 = -1;
    pub const TOP: i32 = 0;
    pub const DEFAULT: i32 = 50;
    pub const BOTTOM: i32 = 100;
}

/// A module's terminal output: display metadata plus an opaque payload
/// consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Matches the producing module's handle.
    pub handle: String,
    pub title: String,
    /// Display ordering key, see [`display_order`].
    pub order: i32,
    pub mode: DisplayMode,
    pub content: serde_json::Value,
}

/// Cross-module collector owned by the parser.
///
/// The original design let any module push suggestions and checklist rules
/// into central collector modules. Under the peer-borrow model a module can
/// only *read* earlier peers, so the collectors instead live here: the output
/// phase hands every module `&mut ResultBoard`, and non-empty boards
/// materialise as two well-known results after all module outputs ran.
#[derive(Debug, Default)]
pub struct ResultBoard {
    suggestions: Vec<Suggestion>,
    rules: Vec<ChecklistRule>,
}

impl ResultBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_suggestion(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    pub fn add_rule(&mut self, rule: ChecklistRule) {
        self.rules.push(rule);
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn rules(&self) -> &[ChecklistRule] {
        &self.rules
    }

    /// Materialise the board into its well-known results, most severe
    /// suggestions first. Empty collections produce no result.
    pub fn into_results(mut self) -> Vec<AnalysisResult> {
        let mut results = Vec::new();

        if !self.rules.is_empty() {
            let rules: Vec<serde_json::Value> = self
                .rules
                .iter()
                .map(|rule| {
                    json!({
                        "module": rule.module,
                        "name": rule.name,
                        "description": rule.description,
                        "target": rule.target,
                        "percent": rule.percent(),
                        "passed": rule.passed(),
                        "requirements": rule.requirements,
                    })
                })
                .collect();

            results.push(AnalysisResult {
                handle: "checklist".to_string(),
                title: "Checklist".to_string(),
                order: display_order::CHECKLIST,
                mode: DisplayMode::Full,
                content: json!({ "rules": rules }),
            });
        }

        if !self.suggestions.is_empty() {
            self.suggestions
                .sort_by(|a, b| b.severity.cmp(&a.severity));

            results.push(AnalysisResult {
                handle: "suggestions".to_string(),
                title: "Suggestions".to_string(),
                order: display_order::SUGGESTIONS,
                mode: DisplayMode::Full,
                content: json!({ "suggestions": self.suggestions }),
            });
        }

        results
    }
}
