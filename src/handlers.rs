use crate::config::TrackerConfig;
use crate::coordinator::{UpdateCoordinator, UpdateOutcome};
use crate::dates::{date_key, today};
use crate::errors::AppError;
use crate::grid::project;
use crate::models::{ActivityLog, OutcomeKind, RecordRequest, RecordResponse, TodayResponse, WidgetView};
use crate::prompt::RequestPrompt;
use crate::state::AppState;
use crate::stats::{current_streak, streak_label, total_completed_value};
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Fields posted by the HTML form. An unchecked checkbox is simply absent.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub confirm: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let data = state.data.lock().await;
    let log = data.activity_log(&state.config.activity);
    let view = widget_view(&state.config, &log, today);
    let today = today_response(&state.config, &log, today);
    Html(render_index(&state.config, &view, &today))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let data = state.data.lock().await;
    let log = data.activity_log(&state.config.activity);
    Ok(Json(today_response(&state.config, &log, today())))
}

pub async fn get_widget(State(state): State<AppState>) -> Result<Json<WidgetView>, AppError> {
    let data = state.data.lock().await;
    let log = data.activity_log(&state.config.activity);
    Ok(Json(widget_view(&state.config, &log, today())))
}

pub async fn record(
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, AppError> {
    let response = apply_record(&state, payload).await?;
    Ok(Json(response))
}

pub async fn record_form(
    State(state): State<AppState>,
    Form(form): Form<RecordForm>,
) -> Result<Redirect, AppError> {
    let value = match form.value.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| AppError::bad_request(format!("value must be a number, got {raw}")))?,
        ),
    };
    let request = RecordRequest {
        confirm: form.confirm.is_some(),
        value,
        unit: None,
    };
    apply_record(&state, request).await?;
    Ok(Redirect::to("/"))
}

async fn apply_record(state: &AppState, request: RecordRequest) -> Result<RecordResponse, AppError> {
    let config = &state.config;
    let today = today();
    let date = date_key(today);
    let mut data = state.data.lock().await;

    let mut prompt = RequestPrompt::new(request, &config.default_unit);
    let coordinator = UpdateCoordinator::new(&state.store, &config.activity, &config.default_unit);
    let update = coordinator.record_day(&data, &date, &mut prompt).await?;

    let outcome = match update.outcome {
        UpdateOutcome::Declined => OutcomeKind::Declined,
        UpdateOutcome::Created(_) => OutcomeKind::Created,
        UpdateOutcome::Amended { .. } => OutcomeKind::Amended,
        UpdateOutcome::Unchanged => OutcomeKind::Unchanged,
    };
    *data = update.document;

    let log = data.activity_log(&config.activity);
    Ok(RecordResponse {
        outcome,
        today: today_response(config, &log, today),
    })
}

fn today_response(config: &TrackerConfig, log: &ActivityLog, today: NaiveDate) -> TodayResponse {
    let date = date_key(today);
    let record = log.get(&date).filter(|record| record.completed);
    TodayResponse {
        completed: record.is_some(),
        value: record.map(|r| r.details.value).unwrap_or(0.0),
        unit: record
            .map(|r| r.details.unit.clone())
            .unwrap_or_else(|| config.default_unit.clone()),
        streak: current_streak(log, today),
        total_value: total_completed_value(log),
        date,
    }
}

fn widget_view(config: &TrackerConfig, log: &ActivityLog, today: NaiveDate) -> WidgetView {
    let streak = current_streak(log, today);
    WidgetView {
        activity: config.activity.clone(),
        streak,
        streak_label: streak_label(streak),
        total_value: total_completed_value(log),
        unit: config.default_unit.clone(),
        columns: config.layout.columns,
        cells: project(&config.window, log, &date_key(today)),
    }
}
