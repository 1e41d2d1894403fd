use crate::dates::TrackingWindow;
use crate::errors::ConfigError;
use chrono::NaiveDate;
use std::path::PathBuf;

const DEFAULT_ACTIVITY: &str = "READING";
const DEFAULT_START_DATE: &str = "2025-04-10";
const DEFAULT_PORT: u16 = 8080;

const DEFAULT_WIDGET_WIDTH: f64 = 320.0;
const DEFAULT_PADDING: f64 = 12.0;
const DEFAULT_CIRCLE_SIZE: f64 = 5.0;
const DEFAULT_CIRCLE_SPACING: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub completed: &'static str,
    pub missed: &'static str,
    pub future: &'static str,
    pub muted: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#2c2c2e",
            completed: "#ffffff",
            missed: "#ff0000",
            future: "#888888",
            muted: "#999999",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub columns: u32,
    pub circle_size: f64,
    pub circle_spacing: f64,
    pub padding: f64,
}

/// Settings read once at startup. Nothing here changes while the server runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub activity: String,
    pub default_unit: String,
    pub window: TrackingWindow,
    pub layout: Layout,
    pub palette: Palette,
    pub data_path: PathBuf,
    pub port: u16,
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let activity = match lookup("ACTIVITY_NAME") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    name: "ACTIVITY_NAME",
                });
            }
            Some(raw) => raw.trim().to_string(),
            None => DEFAULT_ACTIVITY.to_string(),
        };
        let default_unit = get("ACTIVITY_UNIT").unwrap_or_else(|| unit_for(&activity).to_string());

        let start_raw = get("START_DATE").unwrap_or_else(|| DEFAULT_START_DATE.to_string());
        let start_date = NaiveDate::parse_from_str(&start_raw, "%Y-%m-%d").map_err(|_| {
            ConfigError::InvalidDate {
                name: "START_DATE",
                value: start_raw.clone(),
            }
        })?;

        let padding = number(&get, "WIDGET_PADDING", DEFAULT_PADDING, true)?;
        let circle_size = number(&get, "CIRCLE_SIZE", DEFAULT_CIRCLE_SIZE, false)?;
        let circle_spacing = number(&get, "CIRCLE_SPACING", DEFAULT_CIRCLE_SPACING, true)?;
        let columns = match get("GRID_COLUMNS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(columns) if columns > 0 => columns,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "GRID_COLUMNS",
                        value: raw,
                    })
                }
            },
            None => {
                let width = number(&get, "WIDGET_WIDTH", DEFAULT_WIDGET_WIDTH, false)?;
                derive_columns(width, padding, circle_size, circle_spacing)?
            }
        };

        let data_path = get("APP_DATA_PATH").map(PathBuf::from).unwrap_or_else(|| {
            PathBuf::from(format!("data/{}_activity_progress.json", activity.to_lowercase()))
        });

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            window: TrackingWindow::compute(start_date),
            layout: Layout {
                columns,
                circle_size,
                circle_spacing,
                padding,
            },
            palette: Palette::default(),
            activity,
            default_unit,
            data_path,
            port,
        })
    }
}

fn unit_for(activity: &str) -> &'static str {
    if activity.eq_ignore_ascii_case("READING") {
        "pages"
    } else {
        "minutes"
    }
}

fn number(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: f64,
    allow_zero: bool,
) -> Result<f64, ConfigError> {
    let Some(raw) = get(name) else {
        return Ok(default);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0)) => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

fn derive_columns(width: f64, padding: f64, size: f64, spacing: f64) -> Result<u32, ConfigError> {
    let available = width - 2.0 * padding;
    let columns = (available / (size + spacing)).floor();
    if columns < 1.0 {
        return Err(ConfigError::NoColumns);
    }
    Ok(columns as u32)
}
