//! Demo server exercising the fixed-length and chunked response paths.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use nano_http::connection::{ResponseWriter, default_headers};
use nano_http::handler::{Handler, HandlerError};
use nano_http::protocol::{Headers, Request, StatusCode};
use nano_http::server::Server;

const ADDR: &str = "127.0.0.1:42069";

const SUCCESS_HTML: &str = "<html>\n  <head>\n    <title>200 OK</title>\n  </head>\n  <body>\n    <h1>Success!</h1>\n    <p>Your request was an absolute banger.</p>\n  </body>\n</html>\n";

const BAD_REQUEST_HTML: &str = "<html>\n  <head>\n    <title>400 Bad Request</title>\n  </head>\n  <body>\n    <h1>Bad Request</h1>\n    <p>Your request honestly kinda sucked.</p>\n  </body>\n</html>\n";

const SERVER_ERROR_HTML: &str = "<html>\n  <head>\n    <title>500 Internal Server Error</title>\n  </head>\n  <body>\n    <h1>Internal Server Error</h1>\n    <p>Okay, you know what? This one is on me.</p>\n  </body>\n</html>\n";

struct DemoHandler;

#[async_trait]
impl<W> Handler<W> for DemoHandler
where
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), HandlerError> {
        match request.target() {
            "/yourproblem" => respond_html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_HTML).await,
            "/myproblem" => respond_html(writer, StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_HTML).await,
            "/stream" => respond_chunked(writer).await,
            _ => respond_html(writer, StatusCode::OK, SUCCESS_HTML).await,
        }
    }
}

async fn respond_html<W>(writer: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_status_line(status).await?;
    let mut headers = default_headers(body.len());
    headers.replace("content-type", "text/html");
    writer.write_headers(&headers).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

/// Streams a body of unknown length and reports its size in a trailer.
async fn respond_chunked<W>(writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_status_line(StatusCode::OK).await?;

    let mut headers = default_headers(0);
    headers.remove("content-length");
    headers.set("transfer-encoding", "chunked");
    headers.set("trailer", "x-content-length");
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for n in 1..=20 {
        let chunk = format!("data line {n}\n");
        writer.write_chunked_body(chunk.as_bytes()).await?;
        total += chunk.len();
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("x-content-length", total.to_string());
    writer.write_trailers(&trailers).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::serve(ADDR, Arc::new(DemoHandler)).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "failed to start server");
            return;
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for shutdown signal");
    }

    server.close();
    info!("server gracefully stopped");
}
