use crate::errors::TrackerError;
use crate::models::{DailyRecord, Details, StoreDocument};
use crate::prompt::{Prompt, PromptContext};
use crate::stats::total_completed_value;
use crate::storage::{amend_value, upsert_completed, ActivityStore};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// No record existed and the user did not confirm completion.
    Declined,
    Created(DailyRecord),
    Amended { record: DailyRecord, delta: f64 },
    /// A completed record existed and nothing was added to it.
    Unchanged,
}

#[derive(Debug)]
pub struct Update {
    pub outcome: UpdateOutcome,
    /// The document as it now stands on disk. Equal to the input when the
    /// outcome wrote nothing.
    pub document: StoreDocument,
}

/// Runs one day's prompt flow for a single activity and persists the result.
pub struct UpdateCoordinator<'a> {
    store: &'a ActivityStore,
    activity: &'a str,
    default_unit: &'a str,
}

impl<'a> UpdateCoordinator<'a> {
    pub fn new(store: &'a ActivityStore, activity: &'a str, default_unit: &'a str) -> Self {
        Self {
            store,
            activity,
            default_unit,
        }
    }

    /// A day with no record can become completed once; a completed day can
    /// only grow. Every change is saved before it is returned, and a failed
    /// save leaves `document` as the current state.
    pub async fn record_day<P: Prompt>(
        &self,
        document: &StoreDocument,
        date_key: &str,
        prompt: &mut P,
    ) -> Result<Update, TrackerError> {
        let log = document.activity_log(self.activity);

        let existing = log.get(date_key).filter(|record| record.completed).cloned();
        let (log, outcome) = match existing {
            None => {
                let confirm = PromptContext::ConfirmCompletion {
                    activity: self.activity.to_string(),
                };
                if !prompt.confirm(&confirm) {
                    debug!("{} not completed on {date_key}", self.activity);
                    return Ok(unchanged(document, UpdateOutcome::Declined));
                }

                let amount = prompt.collect_amount(&PromptContext::CollectInitial {
                    activity: self.activity.to_string(),
                    unit: self.default_unit.to_string(),
                });
                let unit = if amount.unit.trim().is_empty() {
                    self.default_unit.to_string()
                } else {
                    amount.unit
                };
                let details = Details {
                    value: amount.value,
                    unit,
                };
                let log = upsert_completed(&log, date_key, details)?;
                let record = log.get(date_key).cloned().ok_or_else(|| {
                    TrackerError::storage(format!("record for {date_key} vanished after insert"))
                })?;
                (log, UpdateOutcome::Created(record))
            }
            Some(record) => {
                let ask_more = PromptContext::ConfirmAddMore {
                    activity: self.activity.to_string(),
                    today_value: record.details.value,
                    total_value: total_completed_value(&log),
                    unit: record.details.unit.clone(),
                };
                if !prompt.confirm(&ask_more) {
                    debug!("not adding more {} on {date_key}", self.activity);
                    return Ok(unchanged(document, UpdateOutcome::Unchanged));
                }

                let amount = prompt.collect_amount(&PromptContext::CollectAddition {
                    activity: self.activity.to_string(),
                    today_value: record.details.value,
                    unit: record.details.unit.clone(),
                });
                let log = amend_value(&log, date_key, amount.value)?;
                if amount.value == 0.0 {
                    debug!("nothing added to {} on {date_key}", self.activity);
                    return Ok(unchanged(document, UpdateOutcome::Unchanged));
                }
                if amount.unit != record.details.unit {
                    debug!(
                        "ignoring unit {:?}; {date_key} is recorded in {}",
                        amount.unit, record.details.unit
                    );
                }
                let record = log.get(date_key).cloned().unwrap_or(record);
                let delta = amount.value;
                (log, UpdateOutcome::Amended { record, delta })
            }
        };

        let updated = document.with_activity_log(self.activity, &log);
        self.store.save(&updated).await?;

        match &outcome {
            UpdateOutcome::Created(record) => info!(
                "marked {} completed for {date_key} with {} {}",
                self.activity, record.details.value, record.details.unit
            ),
            UpdateOutcome::Amended { record, .. } => info!(
                "updated {} for {date_key} with new total {} {}",
                self.activity, record.details.value, record.details.unit
            ),
            UpdateOutcome::Declined | UpdateOutcome::Unchanged => {}
        }

        Ok(Update {
            outcome,
            document: updated,
        })
    }
}

fn unchanged(document: &StoreDocument, outcome: UpdateOutcome) -> Update {
    Update {
        outcome,
        document: document.clone(),
    }
}
