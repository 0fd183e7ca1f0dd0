//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use waitfor::{Check, CheckError};

/// Bind a listener on an ephemeral port and accept connections until the test ends.
pub async fn start_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    addr
}

/// An address on which nothing is listening.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A check that fails until its `succeed_on`-th call and counts every call.
pub fn counting_check(succeed_on: u32) -> (Check, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let check = Check::from_fn(move || {
        let n = c.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= succeed_on {
            Ok(())
        } else {
            Err(CheckError::Other(format!("not yet ({})", n)))
        }
    });
    (check, calls)
}

pub fn always_fails(calls: Arc<AtomicU32>, msg: &'static str) -> Check {
    Check::from_fn(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(CheckError::Other(msg.to_string()))
    })
}
