//! Gateway served over a real socket.

use std::net::SocketAddr;
use std::time::Duration;

use embed_gateway::lifecycle::Shutdown;
use embed_gateway::HttpServer;

mod common;

use common::{CountingCache, MediaMode, StubMedia, REDIRECT_URL, TELEGRAM_UA};

async fn start() -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let server = HttpServer::with_collaborators(
        common::test_config(),
        CountingCache::new(),
        StubMedia::new(MediaMode::Ok),
    )
    .unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });
    (addr, shutdown, handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_serves_and_shuts_down() {
    let (addr, shutdown, handle) = start().await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/version"))
        .header("user-agent", TELEGRAM_UA)
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["cache-control"], "max-age=1");
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert!(body.contains("HTTP/1.1"));

    let res = client.get(format!("http://{addr}/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), 302);
    assert_eq!(res.headers()["location"], REDIRECT_URL);

    let purge = reqwest::Method::from_bytes(b"PURGE").unwrap();
    let res = client.request(purge, format!("http://{addr}/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.post(format!("http://{addr}/version")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (addr, shutdown, _handle) = start().await;

    let res = client()
        .get(format!("http://{addr}/version"))
        .header("x-request-id", "req-1234")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "req-1234");

    shutdown.trigger();
}
