//! End-to-end tests over a real socket.
//!
//! # Design
//! Each test binds the server to `127.0.0.1:0` and talks to it with ureq,
//! the way an external client would. Shutdown tests drive `run` with a
//! oneshot channel instead of a process signal.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use todo_core::{InMemoryRepository, StorageResult, TodoChanges, TodoId, TodoItem, TodoRepository};
use todo_server::{app, close_storage, run};

/// Agent that returns 4xx/5xx responses as data instead of errors.
fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn send(agent: &ureq::Agent, method: &str, url: &str, body: Option<&str>) -> (u16, serde_json::Value) {
    let result = match (method, body) {
        ("GET", _) => agent.get(url).call(),
        ("DELETE", _) => agent.delete(url).call(),
        ("POST", Some(body)) => agent
            .post(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        ("PUT", Some(body)) => agent
            .put(url)
            .content_type("application/json")
            .send(body.as_bytes()),
        (other, _) => panic!("unsupported request: {other}"),
    };
    let mut response = result.expect("HTTP transport error");
    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string().unwrap_or_default();
    let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// In-memory storage whose `list` takes `delay`.
struct SlowRepository {
    inner: InMemoryRepository,
    delay: Duration,
}

#[async_trait]
impl TodoRepository for SlowRepository {
    async fn list(&self) -> StorageResult<Vec<TodoItem>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list().await
    }

    async fn insert(&self, item: &TodoItem) -> StorageResult<()> {
        self.inner.insert(item).await
    }

    async fn update(&self, id: &TodoId, changes: &TodoChanges) -> StorageResult<bool> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: &TodoId) -> StorageResult<bool> {
        self.inner.delete(id).await
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

struct Running {
    addr: std::net::SocketAddr,
    shutdown: tokio::sync::oneshot::Sender<()>,
    server: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

async fn start(repository: Arc<dyn TodoRepository>, grace: Duration) -> Running {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, signal) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(run(
        listener,
        app(repository),
        async move {
            let _ = signal.await;
        },
        grace,
    ));
    Running {
        addr,
        shutdown,
        server,
    }
}

#[test]
fn crud_lifecycle() {
    // Step 1: start the server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            run(
                listener,
                app(Arc::new(InMemoryRepository::new())),
                std::future::pending(),
                Duration::from_secs(1),
            )
            .await
        })
        .unwrap();
    });

    let agent = agent();
    let base = format!("http://{addr}/todo/");

    // Step 2: list should be empty.
    let (status, body) = send(&agent, "GET", &base, None);
    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::json!([]));

    // Step 3: create.
    let (status, body) = send(&agent, "POST", &base, Some(r#"{"title":"buy milk"}"#));
    assert_eq!(status, 201);
    assert_eq!(body["message"], "Todo created successfully");
    let id = body["todo_id"].as_str().unwrap().to_string();

    // Step 4: list holds one todo, not completed.
    let (_, body) = send(&agent, "GET", &base, None);
    let todos = body["data"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["id"], id.as_str());
    assert_eq!(todos[0]["title"], "buy milk");
    assert_eq!(todos[0]["completed"], false);
    let created_at = todos[0]["created_at"].clone();

    // Step 5: mark completed.
    let (status, body) = send(
        &agent,
        "PUT",
        &format!("{base}{id}"),
        Some(r#"{"title":"buy milk","completed":true}"#),
    );
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Todo updated successfully");

    let (_, body) = send(&agent, "GET", &base, None);
    assert_eq!(body["data"][0]["completed"], true);
    assert_eq!(body["data"][0]["created_at"], created_at);

    // Step 6: empty title is rejected.
    let (status, body) = send(
        &agent,
        "PUT",
        &format!("{base}{id}"),
        Some(r#"{"title":"","completed":false}"#),
    );
    assert_eq!(status, 400);
    assert_eq!(body["message"], "The title field is required");

    // Step 7: delete.
    let (status, body) = send(&agent, "DELETE", &format!("{base}{id}"), None);
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Todo deleted successfully");

    // Step 8: list is empty again.
    let (_, body) = send(&agent, "GET", &base, None);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_stops_accepting_connections() {
    let running = start(Arc::new(InMemoryRepository::new()), Duration::from_secs(1)).await;

    running.shutdown.send(()).unwrap();
    running.server.await.unwrap().unwrap();

    assert!(tokio::net::TcpStream::connect(running.addr).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn in_flight_request_finishes_during_grace_period() {
    let repo = Arc::new(SlowRepository {
        inner: InMemoryRepository::new(),
        delay: Duration::from_millis(400),
    });
    let running = start(repo, Duration::from_secs(5)).await;

    let url = format!("http://{}/todo/", running.addr);
    let request = tokio::task::spawn_blocking(move || send(&agent(), "GET", &url, None));

    // Let the request reach the handler before signalling.
    tokio::time::sleep(Duration::from_millis(150)).await;
    running.shutdown.send(()).unwrap();

    let (status, body) = request.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::json!([]));
    running.server.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_gives_up_after_grace_period() {
    let repo = Arc::new(SlowRepository {
        inner: InMemoryRepository::new(),
        delay: Duration::from_secs(30),
    });
    let running = start(repo, Duration::from_millis(200)).await;

    let url = format!("http://{}/todo/", running.addr);
    std::thread::spawn(move || {
        let _ = agent().get(&url).call();
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
    let started = Instant::now();
    running.shutdown.send(()).unwrap();
    running.server.await.unwrap().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Storage whose `close` never completes.
struct StuckCloseRepository(InMemoryRepository);

#[async_trait]
impl TodoRepository for StuckCloseRepository {
    async fn list(&self) -> StorageResult<Vec<TodoItem>> {
        self.0.list().await
    }

    async fn insert(&self, item: &TodoItem) -> StorageResult<()> {
        self.0.insert(item).await
    }

    async fn update(&self, id: &TodoId, changes: &TodoChanges) -> StorageResult<bool> {
        self.0.update(id, changes).await
    }

    async fn delete(&self, id: &TodoId) -> StorageResult<bool> {
        self.0.delete(id).await
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) {
        std::future::pending::<()>().await;
    }
}

#[tokio::test]
async fn close_storage_gives_up_after_deadline() {
    let repo = StuckCloseRepository(InMemoryRepository::new());
    let started = Instant::now();

    assert!(!close_storage(&repo, Duration::from_millis(100)).await);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn close_storage_reports_clean_close() {
    let repo = InMemoryRepository::new();
    assert!(close_storage(&repo, Duration::from_secs(1)).await);
}
