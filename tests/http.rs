use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TodayResponse {
    date: String,
    completed: bool,
    value: f64,
    unit: String,
    streak: u32,
    total_value: f64,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    outcome: String,
    today: TodayResponse,
}

#[derive(Debug, Deserialize)]
struct GridCell {
    date: String,
    class: String,
}

#[derive(Debug, Deserialize)]
struct WidgetView {
    activity: String,
    streak: u32,
    streak_label: String,
    columns: u32,
    cells: Vec<GridCell>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("streak_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn start_of_year() -> NaiveDate {
    let today = Local::now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap()
}

async fn get_today(client: &Client, base_url: &str) -> TodayResponse {
    client
        .get(format!("{base_url}/api/today"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_record(client: &Client, base_url: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/record"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_streak_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("ACTIVITY_NAME", "READING")
        .env("START_DATE", start_of_year().format("%Y-%m-%d").to_string())
        .env("GRID_COLUMNS", "37")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_record_then_amend_today() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server.base_url).await;

    let response = post_record(
        &client,
        &server.base_url,
        serde_json::json!({ "confirm": true, "value": 5, "unit": "pages" }),
    )
    .await;
    assert!(response.status().is_success());
    let first: RecordResponse = response.json().await.unwrap();
    assert!(first.today.completed);
    assert_eq!(first.today.unit, "pages");
    assert!(first.today.streak >= 1);
    if before.completed {
        assert_eq!(first.outcome, "amended");
        assert_eq!(first.today.value, before.value + 5.0);
    } else {
        assert_eq!(first.outcome, "created");
        assert_eq!(first.today.value, 5.0);
    }

    let second: RecordResponse = post_record(
        &client,
        &server.base_url,
        serde_json::json!({ "confirm": true, "value": 3 }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(second.outcome, "amended");
    assert_eq!(second.today.value, first.today.value + 3.0);
    assert_eq!(second.today.total_value, first.today.total_value + 3.0);
    assert_eq!(second.today.streak, first.today.streak);

    let today = get_today(&client, &server.base_url).await;
    assert_eq!(today.date, second.today.date);
    assert_eq!(today.value, second.today.value);
}

#[tokio::test]
async fn http_declined_prompt_changes_nothing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server.base_url).await;
    let response: RecordResponse = post_record(
        &client,
        &server.base_url,
        serde_json::json!({ "confirm": false, "value": 50 }),
    )
    .await
    .json()
    .await
    .unwrap();

    let expected = if before.completed { "unchanged" } else { "declined" };
    assert_eq!(response.outcome, expected);
    assert_eq!(response.today.value, before.value);
    assert_eq!(response.today.total_value, before.total_value);
    assert_eq!(response.today.completed, before.completed);
}

#[tokio::test]
async fn http_negative_amount_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server.base_url).await;
    let response = post_record(
        &client,
        &server.base_url,
        serde_json::json!({ "confirm": true, "value": -2 }),
    )
    .await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let after = get_today(&client, &server.base_url).await;
    assert_eq!(after.value, before.value);
    assert_eq!(after.completed, before.completed);
}

#[tokio::test]
async fn http_widget_covers_the_year() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let widget: WidgetView = client
        .get(format!("{}/api/widget", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let start = start_of_year();
    let end = NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap();
    assert_eq!(widget.cells.len() as i64, (end - start).num_days() + 1);
    assert_eq!(widget.activity, "READING");
    assert_eq!(widget.columns, 37);
    assert!(widget.streak_label.starts_with(&widget.streak.to_string()));

    let today = get_today(&client, &server.base_url).await;
    let cell = widget.cells.iter().find(|cell| cell.date == today.date).unwrap();
    let expected = if today.completed { "completed" } else { "missed" };
    assert_eq!(cell.class, expected);
    assert!(
        widget
            .cells
            .iter()
            .filter(|cell| cell.date > today.date)
            .all(|cell| cell.class == "future")
    );

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("READING"));
    assert!(page.contains(&widget.streak_label));
}

#[tokio::test]
async fn http_form_rejects_partly_numeric_value() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_today(&client, &server.base_url).await;
    let response = client
        .post(format!("{}/record", server.base_url))
        .form(&[("confirm", "on"), ("value", "12abc")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let after = get_today(&client, &server.base_url).await;
    assert_eq!(after.value, before.value);
    assert_eq!(after.completed, before.completed);
}
