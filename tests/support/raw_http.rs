//! One-shot HTTP/1.1 responder driven step by step.
//!
//! Covers body-level behavior a mock server cannot produce: a declared
//! `Content-Length` that is never fulfilled, or a body paced with pauses.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What the responder does after the status line and headers.
pub enum Step {
    Send(Vec<u8>),
    Pause(Duration),
}

/// Serves a single `200 OK` declaring `content_length`, then plays `steps`
/// and closes the connection. Returns the URL to request.
pub async fn serve_once(content_length: usize, steps: Vec<Step>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind raw responder");
    let addr = listener.local_addr().expect("responder addr");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for step in steps {
            match step {
                Step::Send(bytes) => {
                    if socket.write_all(&bytes).await.is_err() || socket.flush().await.is_err() {
                        return;
                    }
                }
                Step::Pause(duration) => tokio::time::sleep(duration).await,
            }
        }
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/file.bin")
}
