//! TCP listening check.

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::check::{Check, CheckError};

/// Succeeds once something accepts a TCP connection on `address`
/// (e.g. `"192.168.0.1:1234"`) within `connect_timeout`.
///
/// The connection is closed as soon as it opens.
pub fn service_listening(address: impl Into<String>, connect_timeout: Duration) -> Check {
    let address = address.into();
    Check::new(move || {
        let address = address.clone();
        async move {
            match timeout(connect_timeout, TcpStream::connect(address.as_str())).await {
                Ok(Ok(stream)) => {
                    drop(stream);
                    Ok(())
                }
                Ok(Err(e)) => Err(CheckError::Io(e)),
                Err(_) => Err(CheckError::Timeout(connect_timeout)),
            }
        }
    })
}
