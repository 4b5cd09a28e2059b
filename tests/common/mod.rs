#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const PROJECT: &str = "1a5";
/// `Basic base64("AK:SK")`
pub const EXPECTED_AUTH: &str = "Basic QUs6U0s=";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

impl Recorded {
    pub fn key(&self) -> String {
        route_key(&self.method, &self.path, self.query.as_deref())
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<String, VecDeque<Value>>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

fn route_key(method: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{} {}?{}", method, path, q),
        None => format!("{} {}", method, path),
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let rec = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_str(&body).ok(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    let key = rec.key();
    state.requests.lock().unwrap().push(rec);

    let mut routes = state.routes.lock().unwrap();
    let reply = routes.get_mut(&key).and_then(|q| {
        if q.len() > 1 {
            q.pop_front()
        } else {
            q.front().cloned()
        }
    });
    match reply {
        Some(v) => (StatusCode::OK, axum::Json(v)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"type": "error", "status": 404, "code": "NotFound"})),
        )
            .into_response(),
    }
}

/// In-process stand-in for a Cattle server. Replies are queued per
/// `METHOD path[?query]`; the last queued reply repeats.
pub struct MockCattle {
    pub url: String,
    state: MockState,
}

impl MockCattle {
    pub fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("mock runtime");
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock cattle");
                tx.send(listener.local_addr().expect("mock addr"))
                    .expect("report mock addr");
                axum::serve(listener, app).await.expect("serve mock cattle");
            });
        });
        let addr = rx.recv().expect("mock cattle started");
        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn api(&self, rest: &str) -> String {
        format!("{}/v2-beta/{}", self.url, rest)
    }

    pub fn on(&self, method: &str, path_and_query: &str, replies: Vec<Value>) {
        let (path, query) = match path_and_query.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path_and_query, None),
        };
        let key = route_key(method, &format!("/v2-beta/{}", path), query);
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(key, replies.into_iter().collect());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path_and_query: &str) -> Vec<Recorded> {
        let wanted = format!("{} /v2-beta/{}", method, path_and_query);
        self.requests()
            .into_iter()
            .filter(|r| r.key() == wanted)
            .collect()
    }

    pub fn service(&self, id: &str, name: &str, state: &str, health: &str) -> Value {
        json!({
            "id": id,
            "type": "service",
            "name": name,
            "accountId": PROJECT,
            "stackId": "1st1",
            "state": state,
            "healthState": health,
            "scale": 1,
            "links": {
                "self": self.api(&format!("projects/{}/services/{}", PROJECT, id)),
            },
            "launchConfig": {"imageUuid": format!("docker:{}:1", name), "tty": true},
        })
    }
}

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub mock: MockCattle,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(home.join(".rancher")).expect("create isolated home");

        let mock = MockCattle::start();
        fs::write(
            home.join(".rancher/cli.json"),
            json!({
                "url": format!("{}/v1/schemas", mock.url),
                "accessKey": "AK",
                "secretKey": "SK",
                "environment": PROJECT
            })
            .to_string(),
        )
        .expect("write cli.json");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            mock,
            cargo_home,
            rustup_home,
        }
    }

    pub fn cli_json(&self) -> PathBuf {
        self.home.join(".rancher/cli.json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rancher-tools");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home)
            .env("RUST_LOG", "warn")
            .env_remove("CATTLE_URL")
            .env_remove("CATTLE_ACCESS_KEY")
            .env_remove("CATTLE_SECRET_KEY")
            .args(["--poll-interval-ms", "10"]);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}
