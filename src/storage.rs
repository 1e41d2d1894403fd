use crate::errors::TrackerError;
use crate::models::{is_valid_value, ActivityLog, DailyRecord, Details, StoreDocument};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

/// JSON blob on disk holding every activity's log.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    path: PathBuf,
}

impl ActivityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole blob. A missing file is a first run and yields an
    /// empty document; anything else that prevents reading it is an error.
    pub async fn load(&self) -> Result<StoreDocument, TrackerError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("no data file at {}, starting empty", self.path.display());
                return Ok(StoreDocument::default());
            }
            Err(err) => {
                error!("failed to read data file {}: {err}", self.path.display());
                return Err(TrackerError::storage(err));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StoreDocument::default());
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            error!("failed to parse data file {}: {err}", self.path.display());
            TrackerError::storage(format!("{} is not a JSON object: {err}", self.path.display()))
        })
    }

    /// Replaces the blob on disk. The document is written to a sibling
    /// temporary file first and renamed over the target, so readers see
    /// either the old blob or the new one.
    pub async fn save(&self, doc: &StoreDocument) -> Result<(), TrackerError> {
        let payload = serde_json::to_vec_pretty(doc).map_err(TrackerError::storage)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| {
                error!("failed to create {}: {err}", parent.display());
                TrackerError::storage(err)
            })?;
        }

        let tmp_path = self.path.with_extension(format!("tmp.{}", std::process::id()));
        if let Err(err) = fs::write(&tmp_path, &payload).await {
            error!("failed to write {}: {err}", tmp_path.display());
            let _ = fs::remove_file(&tmp_path).await;
            return Err(TrackerError::storage(err));
        }
        if let Err(err) = fs::rename(&tmp_path, &self.path).await {
            error!("failed to replace {}: {err}", self.path.display());
            let _ = fs::remove_file(&tmp_path).await;
            return Err(TrackerError::storage(err));
        }
        Ok(())
    }
}

pub fn get_record<'a>(log: &'a ActivityLog, date_key: &str) -> Option<&'a DailyRecord> {
    log.get(date_key)
}

/// Records `date_key` as completed. Fails if the day already has a record.
pub fn upsert_completed(
    log: &ActivityLog,
    date_key: &str,
    details: Details,
) -> Result<ActivityLog, TrackerError> {
    if log.get(date_key).is_some() {
        return Err(TrackerError::AlreadyRecorded {
            date: date_key.to_string(),
        });
    }
    if !is_valid_value(details.value) {
        return Err(TrackerError::InvalidAmendment(format!(
            "value must be a finite, non-negative number, got {}",
            details.value
        )));
    }
    Ok(log.with_record(date_key, DailyRecord::completed(details)))
}

/// Adds `delta` to an existing completed record. The unit is left alone.
pub fn amend_value(log: &ActivityLog, date_key: &str, delta: f64) -> Result<ActivityLog, TrackerError> {
    if !is_valid_value(delta) {
        return Err(TrackerError::InvalidAmendment(format!(
            "delta must be a finite, non-negative number, got {delta}"
        )));
    }
    let Some(existing) = log.get(date_key).filter(|record| record.completed) else {
        return Err(TrackerError::InvalidAmendment(format!(
            "{date_key} has no completed record to amend"
        )));
    };

    let value = existing.details.value + delta;
    if !is_valid_value(value) {
        return Err(TrackerError::InvalidAmendment(format!(
            "adding {delta} to {date_key} overflows its value"
        )));
    }

    let mut record = existing.clone();
    record.details.value = value;
    Ok(log.with_record(date_key, record))
}
