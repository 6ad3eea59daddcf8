//! TCP accept loop.
//!
//! [`Server::serve`] binds a listener and spawns the accept loop; every
//! accepted connection runs on its own task with nothing shared between
//! connections. The only cross-task state is the atomic closed flag the
//! acceptor polls, so [`Server::close`] stops accepting without touching
//! in-flight connections.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::select;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;

/// Handle to a running server.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Binds `addr` and starts accepting connections in a background task.
    pub async fn serve<A, H>(addr: A, handler: Arc<H>) -> io::Result<Server>
    where
        A: ToSocketAddrs,
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        tokio::spawn(accept_loop(listener, handler, Arc::clone(&closed), Arc::clone(&shutdown)));

        info!(addr = %local_addr, "server started");
        Ok(Server { local_addr, closed, shutdown })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops the accept loop and closes the listening socket.
    ///
    /// Connections already being served run to completion.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, closed: Arc<AtomicBool>, shutdown: Arc<Notify>)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        let (tcp_stream, remote_addr) = select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    if closed.load(Ordering::SeqCst) {
                        break;
                    }
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        if closed.load(Ordering::SeqCst) {
            break;
        }

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::new(reader, writer);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(remote = %remote_addr, "finished processing, connection shutdown");
                }
                Err(e) => {
                    error!(remote = %remote_addr, cause = %e, "connection closed with error");
                }
            }
        });
    }
    info!("accept loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ResponseWriter, default_headers};
    use crate::handler::HandlerError;
    use crate::protocol::{Request, StatusCode};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
    use tokio::net::TcpStream;

    struct EchoHandler;

    #[async_trait]
    impl<W> Handler<W> for EchoHandler
    where
        W: AsyncWrite + Unpin + Send,
    {
        async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError> {
            let body = format!(
                "method={} target={} body={}",
                request.method(),
                request.target(),
                String::from_utf8_lossy(request.body())
            );
            writer.write_status_line(StatusCode::OK).await?;
            writer.write_headers(&default_headers(body.len())).await?;
            writer.write_body(body.as_bytes()).await?;
            Ok(())
        }
    }

    async fn response_for(server: &Server, message: &str, fragment_size: usize) -> String {
        let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
        for fragment in message.as_bytes().chunks(fragment_size) {
            stream.write_all(fragment).await.unwrap();
            stream.flush().await.unwrap();
        }

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8(response).unwrap()
    }

    #[tokio::test]
    async fn serves_a_request_sent_in_small_fragments() {
        let server = Server::serve("127.0.0.1:0", Arc::new(EchoHandler)).await.unwrap();

        let message = "POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
        let response = response_for(&server, message, 3).await;

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.ends_with("method=POST target=/submit body=hello"));

        server.close();
    }

    #[tokio::test]
    async fn malformed_requests_get_a_400() {
        let server = Server::serve("127.0.0.1:0", Arc::new(EchoHandler)).await.unwrap();

        let response = response_for(&server, "bogus\r\n\r\n", 50).await;

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

        server.close();
    }

    #[tokio::test]
    async fn close_stops_accepting_connections() {
        let server = Server::serve("127.0.0.1:0", Arc::new(EchoHandler)).await.unwrap();
        assert!(!server.is_closed());

        server.close();
        assert!(server.is_closed());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(TcpStream::connect(server.local_addr()).await.is_err());
    }

    #[tokio::test]
    async fn concurrent_connections_are_served_independently() {
        let server = Server::serve("127.0.0.1:0", Arc::new(EchoHandler)).await.unwrap();
        let server = Arc::new(server);

        let mut tasks = Vec::new();
        for i in 0..4 {
            let server = Arc::clone(&server);
            tasks.push(tokio::spawn(async move {
                let message = format!("GET /job/{i} HTTP/1.1\r\nHost: localhost\r\n\r\n");
                let mut stream = TcpStream::connect(server.local_addr()).await.unwrap();
                stream.write_all(message.as_bytes()).await.unwrap();

                let mut response = Vec::new();
                stream.read_to_end(&mut response).await.unwrap();
                (i, String::from_utf8(response).unwrap())
            }));
        }

        for task in tasks {
            let (i, response) = task.await.unwrap();
            assert!(response.ends_with(&format!("method=GET target=/job/{i} body=")));
        }

        server.close();
    }
}
