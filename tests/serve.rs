//! End-to-end tests: a real listener on 127.0.0.1 serving a temporary
//! directory, driven by a hyper HTTP/1.1 client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, HOST,
    LAST_MODIFIED, LOCATION, SERVER,
};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::Notify;

use unityweb_server::config::{AppState, Config};
use unityweb_server::http::date::format_http_date;
use unityweb_server::server::{create_listener, start_server_loop};

const WASM_BYTES: &[u8] = &[0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad, 0xbe, 0xef, 0x00, 0xff];

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    handle: tokio::task::JoinHandle<()>,
    root: TempDir,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

/// Document root from the reference scenario plus a nested build directory
fn scenario_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
    std::fs::write(dir.path().join("build.unityweb.wasm"), WASM_BYTES).unwrap();
    std::fs::create_dir_all(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/app.unityweb.data"), b"gzdata").unwrap();
    std::fs::create_dir_all(dir.path().join("Build/Data")).unwrap();
    std::fs::write(dir.path().join("Build/b.txt"), "b").unwrap();
    std::fs::write(dir.path().join("Build/A.txt"), "a").unwrap();
    dir
}

async fn start_server(root: TempDir) -> TestServer {
    let mut cfg = Config::load(None).unwrap();
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = 0;
    cfg.logging.access_log = false;

    let addr = cfg.get_socket_addr().unwrap();
    let state = Arc::new(AppState::new(cfg, root.path().canonicalize().unwrap()));
    let listener = create_listener(addr).unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Notify::new());
    let handle = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

    TestServer {
        addr,
        shutdown,
        handle,
        root,
    }
}

async fn send(addr: SocketAddr, method: Method, target: &str, headers: &[(&str, &str)]) -> Reply {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let mut builder = Request::builder()
        .method(method)
        .uri(target)
        .header(HOST, addr.to_string());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(Empty::<Bytes>::new()).unwrap();

    let resp = sender.send_request(req).await.unwrap();
    let (parts, body) = resp.into_parts();
    let body = body.collect().await.unwrap().to_bytes();
    Reply {
        status: parts.status,
        headers: parts.headers,
        body,
    }
}

async fn get(addr: SocketAddr, target: &str) -> Reply {
    send(addr, Method::GET, target, &[]).await
}

#[tokio::test]
async fn test_reference_scenario() {
    let server = start_server(scenario_root()).await;

    let index = get(server.addr, "/index.html").await;
    assert_eq!(index.status, StatusCode::OK);
    assert_eq!(index.body, "<html></html>");
    assert_eq!(index.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(index.headers.get(CONTENT_ENCODING).is_none());
    assert_eq!(index.headers[CONTENT_TYPE], "text/html; charset=utf-8");

    let wasm = get(server.addr, "/build.unityweb.wasm").await;
    assert_eq!(wasm.status, StatusCode::OK);
    assert_eq!(&wasm.body[..], WASM_BYTES);
    assert_eq!(wasm.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(wasm.headers[CONTENT_ENCODING], "gzip");
    assert_eq!(wasm.headers[CONTENT_TYPE], "application/wasm");

    let missing = get(server.addr, "/missing.txt").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_gzip_header_follows_path_not_content() {
    let server = start_server(scenario_root()).await;

    let data = get(server.addr, "/assets/app.unityweb.data").await;
    assert_eq!(data.status, StatusCode::OK);
    assert_eq!(data.headers[CONTENT_ENCODING], "gzip");
    assert_eq!(data.body, "gzdata");

    let missing = get(server.addr, "/nothing.unityweb").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.headers[CONTENT_ENCODING], "gzip");
}

#[tokio::test]
async fn test_file_contents_and_headers() {
    let server = start_server(scenario_root()).await;
    let on_disk = std::fs::read(server.root.path().join("build.unityweb.wasm")).unwrap();

    let reply = get(server.addr, "/build.unityweb.wasm").await;
    assert_eq!(&reply.body[..], &on_disk[..]);
    assert_eq!(reply.headers[CONTENT_LENGTH], on_disk.len().to_string().as_str());
    assert!(reply.headers.contains_key(LAST_MODIFIED));
    assert!(reply.headers[SERVER]
        .to_str()
        .unwrap()
        .starts_with("unityweb-server/"));
}

#[tokio::test]
async fn test_head_has_headers_without_body() {
    let server = start_server(scenario_root()).await;

    let reply = send(server.addr, Method::HEAD, "/build.unityweb.wasm", &[]).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.is_empty());
    assert_eq!(reply.headers[CONTENT_LENGTH], WASM_BYTES.len().to_string().as_str());
    assert_eq!(reply.headers[CONTENT_ENCODING], "gzip");
    assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_unsupported_method() {
    let server = start_server(scenario_root()).await;

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
        let reply = send(server.addr, method, "/index.html", &[]).await;
        assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}

#[tokio::test]
async fn test_root_serves_index() {
    let server = start_server(scenario_root()).await;

    let reply = get(server.addr, "/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "<html></html>");
}

#[tokio::test]
async fn test_directory_redirect_keeps_query() {
    let server = start_server(scenario_root()).await;

    let reply = get(server.addr, "/Build?v=2").await;
    assert_eq!(reply.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(reply.headers[LOCATION], "/Build/?v=2");
    assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(reply.body.is_empty());
}

#[tokio::test]
async fn test_directory_listing() {
    let server = start_server(scenario_root()).await;

    let reply = get(server.addr, "/Build/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers[CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let html = std::str::from_utf8(&reply.body).unwrap();
    assert!(html.contains("Directory listing for /Build/"));
    let a = html.find("<a href=\"A.txt\">A.txt</a>").unwrap();
    let b = html.find("<a href=\"b.txt\">b.txt</a>").unwrap();
    let data = html.find("<a href=\"Data/\">Data/</a>").unwrap();
    assert!(a < b && b < data);
}

#[tokio::test]
async fn test_file_with_trailing_slash_is_not_found() {
    let server = start_server(scenario_root()).await;

    let reply = get(server.addr, "/index.html/").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_parent_segments_cannot_escape_root() {
    let outer = tempfile::tempdir().unwrap();
    std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = tempfile::tempdir_in(outer.path()).unwrap();
    std::fs::write(root.path().join("public.txt"), "public").unwrap();
    let server = start_server(root).await;

    for target in ["/../secret.txt", "/%2e%2e/secret.txt", "/..%2Fsecret.txt"] {
        let reply = get(server.addr, target).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{target}");
        assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    let reply = get(server.addr, "/../public.txt").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "public");
}

#[tokio::test]
async fn test_percent_encoded_names() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("my file.txt"), "spaced").unwrap();
    let server = start_server(root).await;

    let reply = get(server.addr, "/my%20file.txt").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "spaced");
}

#[tokio::test]
async fn test_if_modified_since() {
    let server = start_server(scenario_root()).await;

    let future = format_http_date(SystemTime::now() + Duration::from_secs(3600));
    let reply = send(
        server.addr,
        Method::GET,
        "/build.unityweb.wasm",
        &[("If-Modified-Since", future.as_str())],
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_MODIFIED);
    assert!(reply.body.is_empty());
    assert_eq!(reply.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(reply.headers[CONTENT_ENCODING], "gzip");

    let reply = send(
        server.addr,
        Method::GET,
        "/build.unityweb.wasm",
        &[("If-Modified-Since", "Sun, 06 Nov 1994 08:49:37 GMT")],
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(
        server.addr,
        Method::GET,
        "/build.unityweb.wasm",
        &[("If-Modified-Since", future.as_str()), ("If-None-Match", "\"x\"")],
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_keep_alive_serves_multiple_requests() {
    let server = start_server(scenario_root()).await;

    let stream = TcpStream::connect(server.addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    for target in ["/index.html", "/missing", "/build.unityweb.wasm"] {
        let req = Request::builder()
            .uri(target)
            .header(HOST, server.addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = sender.send_request(req).await.unwrap();
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        resp.into_body().collect().await.unwrap();
    }
}

#[tokio::test]
async fn test_shutdown_stops_accept_loop() {
    let server = start_server(scenario_root()).await;
    assert_eq!(get(server.addr, "/index.html").await.status, StatusCode::OK);

    server.shutdown.notify_one();
    tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("accept loop did not stop")
        .unwrap();
}
