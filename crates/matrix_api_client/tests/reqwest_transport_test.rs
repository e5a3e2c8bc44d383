//! Tests for the reqwest transport against a local one-shot HTTP server.

use matrix_api_client::{AsyncHttpApi, HttpApi, ReqwestTransport};
use matrix_api_core::{ApiRequest, ApiSession};
use serde_json::json;
use std::io::{Read, Write};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned response per entry, returning each raw request received.
async fn serve(responses: Vec<(u16, &'static str)>) -> anyhow::Result<(String, JoinHandle<Vec<String>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = tokio::spawn(async move {
        let mut received = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept");
            received.push(read_request(&mut socket).await);

            let reason = if status == 429 { "Too Many Requests" } else { "OK" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.expect("shutdown");
        }
        received
    });

    Ok((base_url, handle))
}

/// Read a request head plus a `Content-Length` body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn session(base_url: &str) -> ApiSession {
    ApiSession::builder()
        .base_url(base_url)
        .token("1234")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_reqwest_transport_sends_descriptor() -> anyhow::Result<()> {
    let (base_url, server) = serve(vec![(200, r#"{"room_id":"!new:test"}"#)]).await?;
    let api = AsyncHttpApi::new(session(&base_url))?;

    let response = api
        .send(ApiRequest::post("/createRoom").with_json(json!({"name": "Ops"})))
        .await?;
    assert_eq!(response, json!({"room_id": "!new:test"}));

    let received = server.await?;
    assert_eq!(received.len(), 1);
    let request = &received[0];
    assert!(request.starts_with("POST /_matrix/client/r0/createRoom?access_token=1234 HTTP/1.1"));
    assert!(request.to_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"name":"Ops"}"#));
    Ok(())
}

#[tokio::test]
async fn test_reqwest_transport_retries_429() -> anyhow::Result<()> {
    let (base_url, server) = serve(vec![
        (429, r#"{"errcode":"M_LIMIT_EXCEEDED","retry_after_ms":20}"#),
        (200, r#"{}"#),
    ])
    .await?;
    let api = AsyncHttpApi::with_transport(session(&base_url), ReqwestTransport::new(true)?);

    api.send(ApiRequest::get("/sync")).await?;

    let received = server.await?;
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], received[1]);
    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() -> anyhow::Result<()> {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let api = AsyncHttpApi::new(session(&base_url))?;
    let err = api.send(ApiRequest::get("/sync")).await.unwrap_err();
    assert!(err.is_transport());
    Ok(())
}

/// Thread-based counterpart of [`serve`] for the blocking transport.
fn serve_blocking(
    responses: Vec<(u16, &'static str)>,
) -> anyhow::Result<(String, std::thread::JoinHandle<Vec<String>>)> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let handle = std::thread::spawn(move || {
        let mut received = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().expect("accept");
            received.push(read_request_blocking(&mut socket));

            let reason = if status == 429 { "Too Many Requests" } else { "OK" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).expect("write");
            socket.flush().expect("flush");
        }
        received
    });

    Ok((base_url, handle))
}

fn read_request_blocking(socket: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn test_blocking_transport_sends_descriptor() -> anyhow::Result<()> {
    let (base_url, server) = serve_blocking(vec![(200, r#"{"event_id":"$e:test"}"#)])?;
    let api = HttpApi::new(session(&base_url))?;

    let response = api.send(
        ApiRequest::put("/rooms/!r:test/send/m.room.message/txn1")
            .with_json(json!({"body": "hi"})),
    )?;
    assert_eq!(response, json!({"event_id": "$e:test"}));

    let received = server.join().expect("server thread");
    assert_eq!(received.len(), 1);
    let request = &received[0];
    assert!(request.starts_with(
        "PUT /_matrix/client/r0/rooms/!r:test/send/m.room.message/txn1?access_token=1234 HTTP/1.1"
    ));
    assert!(request.to_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"body":"hi"}"#));
    Ok(())
}

#[test]
fn test_blocking_transport_retries_429() -> anyhow::Result<()> {
    let (base_url, server) = serve_blocking(vec![
        (429, r#"{"errcode":"M_LIMIT_EXCEEDED","retry_after_ms":20}"#),
        (200, r#"{}"#),
    ])?;
    let api = HttpApi::new(session(&base_url))?;

    assert_eq!(api.send(ApiRequest::get("/sync"))?, json!({}));

    let received = server.join().expect("server thread");
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], received[1]);
    Ok(())
}

#[test]
fn test_blocking_connection_refused_is_transport_error() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let base_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let api = HttpApi::new(session(&base_url))?;
    let err = api.send(ApiRequest::get("/sync")).unwrap_err();
    assert!(err.is_transport());
    Ok(())
}
