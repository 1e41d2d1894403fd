use crate::models::RecordRequest;
use crate::stats::format_value;

/// What the user is being asked. Carries enough state to word the question
/// the way the widget always has.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptContext {
    ConfirmCompletion {
        activity: String,
    },
    CollectInitial {
        activity: String,
        unit: String,
    },
    ConfirmAddMore {
        activity: String,
        today_value: f64,
        total_value: f64,
        unit: String,
    },
    CollectAddition {
        activity: String,
        today_value: f64,
        unit: String,
    },
}

impl PromptContext {
    pub fn title(&self) -> String {
        match self {
            Self::ConfirmCompletion { activity } | Self::ConfirmAddMore { activity, .. } => {
                format!("Activity: {activity}")
            }
            Self::CollectInitial { unit, .. } if is_pages(unit) => "Pages Read".to_string(),
            Self::CollectInitial { .. } => "Duration".to_string(),
            Self::CollectAddition { unit, .. } if is_pages(unit) => "Add Pages".to_string(),
            Self::CollectAddition { .. } => "Add Duration".to_string(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ConfirmCompletion { .. } => "Did you complete the task today?".to_string(),
            Self::CollectInitial { unit, .. } if is_pages(unit) => {
                "How many pages did you read today?".to_string()
            }
            Self::CollectInitial { activity, unit } => {
                format!("How many {unit} did you spend on {} today?", activity.to_lowercase())
            }
            Self::ConfirmAddMore {
                today_value,
                total_value,
                unit,
                ..
            } => {
                let (today, total) = (format_value(*today_value), format_value(*total_value));
                if is_pages(unit) {
                    format!(
                        "You have read a total of {total} pages.\nToday you read {today} pages.\n\nDo you want to add more?"
                    )
                } else {
                    format!(
                        "You have spent a total of {total} {unit}.\nToday you spent {today} {unit}.\n\nDo you want to add more?"
                    )
                }
            }
            Self::CollectAddition {
                today_value, unit, ..
            } => {
                let today = format_value(*today_value);
                if is_pages(unit) {
                    format!(
                        "You have already read {today} pages today. How many more pages would you like to add?"
                    )
                } else {
                    format!(
                        "You have already spent {today} {unit} today. How many more {unit} would you like to add?"
                    )
                }
            }
        }
    }
}

fn is_pages(unit: &str) -> bool {
    unit == "pages"
}

#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    pub value: f64,
    pub unit: String,
}

/// Source of answers for the update flow. Declining is a normal answer:
/// `false` from `confirm`, a zero amount from `collect_amount`.
pub trait Prompt {
    fn confirm(&mut self, context: &PromptContext) -> bool;

    fn collect_amount(&mut self, context: &PromptContext) -> Amount;
}

/// Answers every question from a submitted request: the same `confirm` flag
/// for both yes/no questions and the submitted value for either amount.
#[derive(Debug)]
pub struct RequestPrompt {
    confirm: bool,
    value: Option<f64>,
    unit: Option<String>,
    default_unit: String,
}

impl RequestPrompt {
    pub fn new(request: RecordRequest, default_unit: impl Into<String>) -> Self {
        Self {
            confirm: request.confirm,
            value: request.value,
            unit: request.unit.filter(|unit| !unit.trim().is_empty()),
            default_unit: default_unit.into(),
        }
    }
}

impl Prompt for RequestPrompt {
    fn confirm(&mut self, _context: &PromptContext) -> bool {
        self.confirm
    }

    fn collect_amount(&mut self, _context: &PromptContext) -> Amount {
        Amount {
            value: self.value.unwrap_or(0.0),
            unit: self.unit.clone().unwrap_or_else(|| self.default_unit.clone()),
        }
    }
}
