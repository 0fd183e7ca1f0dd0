//! HTTP endpoint check.

use std::time::Duration;

use crate::check::{Check, CheckError};

/// Succeeds once a GET on `url` returns a 2xx status within `request_timeout`.
pub fn http_ok(url: impl Into<String>, request_timeout: Duration) -> Check {
    let url = url.into();
    let client = reqwest::Client::builder()
        .timeout(request_timeout)
        .user_agent("waitfor-readiness-check")
        .build()
        .map_err(|e| e.to_string());

    Check::new(move || {
        let url = url.clone();
        let client = client.clone();
        async move {
            let client = client.map_err(|e| CheckError::Other(format!("HTTP client unavailable: {}", e)))?;
            let response = client.get(url.as_str()).send().await.map_err(|e| {
                if e.is_timeout() {
                    CheckError::Timeout(request_timeout)
                } else {
                    CheckError::Http(e)
                }
            })?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(CheckError::Status(status.as_u16()))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_status(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status_line
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}/health", addr)
    }

    #[tokio::test]
    async fn test_success_status() {
        let url = serve_status("200 OK").await;
        let check = http_ok(url, Duration::from_secs(2));
        assert!(check.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status() {
        let url = serve_status("503 Service Unavailable").await;
        let check = http_ok(url, Duration::from_secs(2));
        let err = check.run().await.unwrap_err();
        assert!(matches!(err, CheckError::Status(503)));
    }
}
