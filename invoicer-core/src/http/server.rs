//! Hyper server loop
//!
//! One Tokio task per connection, HTTP/1.1 only.

use crate::app::InvoicerApp;
use anyhow::{Context, Result};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct HttpServer {
    app: Arc<InvoicerApp>,
}

impl HttpServer {
    pub fn new(app: Arc<InvoicerApp>) -> Self {
        Self { app }
    }

    /// Bind `addr` and serve until Ctrl-C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let listener =
            TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {}", addr))?;

        self.serve_with_shutdown(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve connections from `listener` until `shutdown` completes
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr().context("Listener has no local address")?;
        log::info!("Listening on http://{}", local_addr);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, remote) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            log::error!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    let app = self.app.clone();
                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            let app = app.clone();
                            async move { Ok::<_, Infallible>(app.handle(req).await) }
                        });

                        if let Err(e) =
                            http1::Builder::new().serve_connection(TokioIo::new(stream), service).await
                        {
                            log::debug!("Connection from {} ended with error: {}", remote, e);
                        }
                    });
                }
                _ = &mut shutdown => {
                    log::info!("Shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvoicerConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let app = Arc::new(InvoicerApp::builder(InvoicerConfig::default()).build().unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(HttpServer::new(app).serve_with_shutdown(listener, async {
            let _ = stop_rx.await;
        }));

        let home = raw_request(addr, "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await;
        assert!(home.starts_with("HTTP/1.1 200 OK"), "{}", home);

        let gated = raw_request(
            addr,
            "GET /dashboard HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(gated.starts_with("HTTP/1.1 302 Found"), "{}", gated);
        assert!(gated.to_lowercase().contains("location: /login"), "{}", gated);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
