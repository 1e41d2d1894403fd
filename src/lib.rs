pub mod app;
pub mod config;
pub mod coordinator;
pub mod dates;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::TrackerConfig;
pub use state::AppState;
pub use storage::ActivityStore;
