pub mod display;
pub mod formatting;

pub use display::{
    ChecklistRequirement, ChecklistRule, DisplayMode, Severity, SeverityTiers, Suggestion,
};
