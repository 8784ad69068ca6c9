use std::time::Duration;

use objrt_model::{Endpoint, RuntimeNode};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::protocol::{
    FrameError, Request, decode_response, read_frame, write_frame,
};

/// Bound on the connect and, separately, on the response read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One-shot client: every fetch opens a fresh connection, sends one
/// request and reads one response. Nothing is retried.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    timeout: Duration,
}

impl Default for RuntimeClient {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RuntimeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the snapshot at `path` and stamps `host:port` on every
    /// object in it, so callers can drill further in later.
    pub async fn fetch(
        &self,
        host: &str,
        port: u16,
        path: &str,
    ) -> Result<RuntimeNode> {
        let payload = self.fetch_raw(host, port, path).await?;
        let node = decode_response(&payload)?.into_result()?;
        Ok(node.with_origin(Endpoint::new(host, port)))
    }

    /// Like [`RuntimeClient::fetch`] but returns the undecoded response body.
    pub async fn fetch_raw(
        &self,
        host: &str,
        port: u16,
        path: &str,
    ) -> Result<Vec<u8>> {
        let request = Request::get_object(path).to_bytes()?;
        debug!(host, port, path, "fetching object");

        let mut stream = timeout(self.timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| FrameError::TimedOut(self.timeout))?
            .map_err(FrameError::Io)?;

        write_frame(&mut stream, &request).await?;

        let payload = timeout(self.timeout, read_frame(&mut stream))
            .await
            .map_err(|_| FrameError::TimedOut(self.timeout))??;
        Ok(payload)
    }

    /// Fetches `node.path + "/" + child` from the server `node` came from.
    pub async fn drill_down(
        &self,
        node: &RuntimeNode,
        child: &str,
    ) -> Result<RuntimeNode> {
        let origin = node.origin().ok_or_else(|| {
            RuntimeError::Protocol(format!(
                "`{}` carries no origin to reconnect to",
                node.path()
            ))
        })?;
        let path = node
            .path()
            .child(child)
            .map_err(|err| RuntimeError::Protocol(err.to_string()))?;

        self.fetch(&origin.host, origin.port, path.as_str()).await
    }
}
