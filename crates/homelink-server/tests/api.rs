//! End-to-end tests: real listener, WebSocket controller, HTTP client.

use futures_util::{SinkExt, StreamExt};
use homelink_server::AppState;
use homelink_store::{DeviceStateStore, MemoryStore};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Controller = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        Self::with_store(DeviceStateStore::new(Arc::new(MemoryStore::new()))).await
    }

    async fn with_store(store: DeviceStateStore) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(store);
        tokio::spawn(homelink_server::serve(listener, state, std::future::pending()));
        Self {
            addr,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}/api/v1{}", self.addr, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.http.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self.http.post(self.url(path)).json(&body).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn connect_controller(&self) -> Controller {
        let (ws, _) = connect_async(format!("ws://{}/api/v1/ws", self.addr))
            .await
            .unwrap();
        ws
    }

    /// Poll `path` until `check` accepts the body.
    async fn wait_for<F>(&self, path: &str, check: F) -> Value
    where
        F: Fn(&Value) -> bool,
    {
        for _ in 0..200 {
            let (_, body) = self.get(path).await;
            if check(&body) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("{path} never reached the expected state");
    }

    async fn wait_connected(&self, connected: bool) {
        self.wait_for("/health", |b| b["controller_connected"] == json!(connected))
            .await;
    }
}

async fn next_text(controller: &mut Controller) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), controller.next())
            .await
            .expect("timed out waiting for command")
            .expect("controller stream ended")
            .unwrap();
        if let Message::Text(text) = frame {
            return text.as_str().to_owned();
        }
    }
}

#[tokio::test]
async fn test_toggle_round_trip() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/lamp", json!({"state": "on"})).await;
    assert_eq!(status, 503);
    assert_eq!(body, json!({"error": "Unity client not connected"}));

    let mut controller = server.connect_controller().await;
    server.wait_connected(true).await;

    let (status, body) = server.post("/lamp", json!({"state": "on"})).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"message": "Command sent", "command": "lamp:status:on"})
    );
    assert_eq!(next_text(&mut controller).await, "lamp:status:on");

    let (_, body) = server.get("/lamp/status").await;
    assert_eq!(body, json!({"lamp": true}));

    let (status, body) = server.post("/lamp", json!({"state": "ON"})).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Lamp is already on."}));
}

#[tokio::test]
async fn test_volume_round_trip() {
    let server = TestServer::start().await;
    let mut controller = server.connect_controller().await;
    server.wait_connected(true).await;

    let (_, body) = server.get("/tv/volume").await;
    assert_eq!(body, json!({"tv_volume": 50}));

    let (status, body) = server.post("/tv/volume", json!({"change": 5})).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"message": "TV volume command sent", "command": "tv:volume:5", "new_volume": 55})
    );
    assert_eq!(next_text(&mut controller).await, "tv:volume:5");

    let (_, body) = server.post("/radio/volume", json!({"change": -50})).await;
    assert_eq!(body["new_volume"], json!(0));
    assert_eq!(next_text(&mut controller).await, "radio:volume:-50");

    let (_, body) = server.get("/tv/volume").await;
    assert_eq!(body, json!({"tv_volume": 55}));
}

#[tokio::test]
async fn test_controller_reports_update_state() {
    let server = TestServer::start().await;
    let mut controller = server.connect_controller().await;
    server.wait_connected(true).await;

    controller
        .send(Message::Text("TV:Volume:80".into()))
        .await
        .unwrap();
    controller
        .send(Message::Text("not a command".into()))
        .await
        .unwrap();
    controller
        .send(Message::Text("radio:status:ON".into()))
        .await
        .unwrap();

    server.wait_for("/tv/volume", |b| b["tv_volume"] == json!(80)).await;
    server.wait_for("/radio/status", |b| b["radio"] == json!(true)).await;
    server.wait_connected(true).await;
}

#[tokio::test]
async fn test_disconnect_clears_controller() {
    let server = TestServer::start().await;
    let mut controller = server.connect_controller().await;
    server.wait_connected(true).await;

    controller.close(None).await.unwrap();
    server.wait_connected(false).await;

    let (status, _) = server.post("/tv/volume", json!({"change": 1})).await;
    assert_eq!(status, 503);
}

#[tokio::test]
async fn test_newest_controller_wins() {
    let server = TestServer::start().await;
    let mut first = server.connect_controller().await;
    server.wait_connected(true).await;

    let mut second = server.connect_controller().await;
    // Registration runs on the server after the handshake completes.
    tokio::time::sleep(Duration::from_millis(200)).await;

    let (status, _) = server.post("/radio", json!({"state": "on"})).await;
    assert_eq!(status, 200);
    assert_eq!(next_text(&mut second).await, "radio:status:on");

    // The server drops the superseded channel; the old client sees it end.
    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match first.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "superseded controller was left open");
    drop(first);
    server.wait_connected(true).await;

    let (status, _) = server.post("/tv", json!({"state": "on"})).await;
    assert_eq!(status, 200);
    assert_eq!(next_text(&mut second).await, "tv:status:on");
}

#[tokio::test]
async fn test_request_errors() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/toaster/status").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Unknown device: toaster"}));

    let (status, _) = server.post("/lamp", json!({"state": "dim"})).await;
    assert_eq!(status, 400);

    let (status, body) = server.get("/lamp/volume").await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "Lamp has no volume control"}));
}

#[tokio::test]
async fn test_malformed_bodies_return_json_errors() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/lamp", json!({"stat": "on"})).await;
    assert_eq!(status, 422);
    assert!(body["error"].as_str().unwrap().contains("state"));

    let (status, body) = server.post("/tv/volume", json!({"change": "x"})).await;
    assert_eq!(status, 422);
    assert!(body["error"].is_string());

    let resp = server
        .http
        .post(server.url("/lamp"))
        .header("content-type", "application/json")
        .body("state=on")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let resp = server
        .http
        .post(server.url("/lamp"))
        .body(r#"{"state": "on"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 415);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_backend() {
    let server = TestServer::with_store(DeviceStateStore::new(Arc::new(
        MemoryStore::with_demo_scene(),
    )))
    .await;

    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["store"], json!("memory"));
    assert_eq!(body["controller_connected"], json!(false));

    let (_, body) = server.get("/kitchenlight/status").await;
    assert_eq!(body, json!({"kitchenlight": true}));
    let (_, body) = server.get("/radio/volume").await;
    assert_eq!(body, json!({"radio_volume": 6}));
}
