use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use objrt_core::PathResolver;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, info, warn};

use crate::errors::ServerError;
use crate::handler::handle_connection;

/// Accept loop over one bound TCP endpoint.
#[derive(Debug)]
pub struct RuntimeServer {
    listener: TcpListener,
    resolver: Arc<PathResolver>,
}

impl RuntimeServer {
    pub async fn bind<A>(
        addr: A,
        resolver: PathResolver,
    ) -> Result<Self, ServerError>
    where
        A: ToSocketAddrs + std::fmt::Display,
    {
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self {
            listener,
            resolver: Arc::new(resolver),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Serves until the process exits.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes. Handlers already running are left
    /// to finish on their own.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let local_addr = self.local_addr()?;
        info!(
            %local_addr,
            roots = self.resolver.bindings().len(),
            "runtime server listening"
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(%local_addr, "runtime server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "accepted connection");
                        let resolver = Arc::clone(&self.resolver);
                        tokio::spawn(async move {
                            let peer = peer.to_string();
                            handle_connection(stream, &peer, &resolver).await;
                        });
                    }
                    Err(err) => {
                        warn!(error = %err, "failed to accept connection");
                    }
                },
            }
        }
    }
}
