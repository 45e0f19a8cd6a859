//! hashbatch server - batch SHA-256 hashing over HTTP.
//!
//! Accepts `POST /foo` with a JSON array of `{"str_a", "str_b"}` objects and
//! answers with `{"hashes": [...]}`, reusing pooled request buffers and item
//! batches across requests.
//!
//! # Usage
//!
//! ```text
//! LISTEN_ADDR=127.0.0.1:6060 hashbatch-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN_ADDR` | `127.0.0.1:6060` | Bind address |
//! | `ENDPOINT_PATH` | `/foo` | Path of the hashing endpoint |
//! | `POOL_SIZE` | *(available CPUs)* | Idle entries kept per pool |
//! | `BUFFER_CAPACITY` | `1048576` | Initial byte buffer capacity |
//! | `BATCH_CAPACITY` | `100` | Initial item batch capacity |
//! | `POOL_PREFILL` | `true` | Fill pools at startup |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hashbatch_core::{BatchProcessor, HashBatchConfig, HashBatchHandler};
use hashbatch_http::router::HEALTH_PATH;
use hashbatch_http::{BatchHandler, HashHttpConfig, HashHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`HashHttpConfig`] from the application [`HashBatchConfig`].
fn build_http_config(config: &HashBatchConfig) -> HashHttpConfig {
    HashHttpConfig {
        endpoint_path: config.endpoint_path.clone(),
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: BatchHandler>(listener: TcpListener, service: HashHttpService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the health endpoint.
///
/// Exits with code 0 if the response is 200 OK and reports the server as
/// running, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request =
        format!("GET {HEALTH_PATH} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Accept any 200 response that reports the server as running.
fn is_healthy_response(response: &str) -> bool {
    response.contains("200 OK") && response.contains("\"running\"")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = HashBatchConfig::from_env().context("failed to load configuration")?;

    // Handle --health-check flag for container probes.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.listen_addr.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    info!(
        pool_size = config.pools.pool_size,
        buffer_capacity = config.pools.buffer_capacity,
        batch_capacity = config.pools.batch_capacity,
        prefill = config.pools.prefill,
        "initializing batch processor",
    );
    let processor = Arc::new(BatchProcessor::new(&config.pools));
    let handler = HashBatchHandler::new(processor);
    let service = HashHttpService::new(Arc::new(handler), build_http_config(&config));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen_addr))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        endpoint = %config.endpoint_path,
        version = VERSION,
        "starting hashbatch server",
    );

    serve(listener, service).await
}
