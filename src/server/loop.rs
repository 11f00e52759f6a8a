// Server loop module
// Accepts connections until shutdown, then drains in-flight requests

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL: Duration = Duration::from_millis(100);

/// Run the accept loop until `shutdown` resolves.
///
/// After shutdown the listener is closed immediately and every connection is
/// told to stop: idle ones close at once, those with a request in flight get
/// up to `performance.shutdown_grace` seconds to finish it.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let (stop_tx, stop_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state, &stop_rx),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    stop_tx.send_replace(true);
    drain_connections(&state).await;
}

/// Wait for active connections to finish, at most `shutdown_grace` seconds
async fn drain_connections(state: &AppState) {
    let active = state.active_connections.load(Ordering::SeqCst);
    logger::log_shutdown(active);
    if active == 0 {
        return;
    }

    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(state.config.performance.shutdown_grace);
    while state.active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Grace period elapsed with {} connection(s) still open",
                state.active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let upload_dir = tempfile::tempdir().unwrap();
        let overrides = Overrides {
            upload_dir: Some(upload_dir.path().to_path_buf()),
            ..Overrides::default()
        };
        let config = Config::load_from("does-not-exist/docextract", &overrides).unwrap();
        let state = Arc::new(AppState::new(config));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run_server_loop(listener, Arc::clone(&state), async {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with(r#"{"status":"ok"}"#));

        stop_tx.send(()).unwrap();
        server.await.unwrap();
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_idle_keep_alive_does_not_hold_shutdown() {
        let upload_dir = tempfile::tempdir().unwrap();
        let overrides = Overrides {
            upload_dir: Some(upload_dir.path().to_path_buf()),
            ..Overrides::default()
        };
        let mut config = Config::load_from("does-not-exist/docextract", &overrides).unwrap();
        config.performance.shutdown_grace = 30;
        let state = Arc::new(AppState::new(config));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run_server_loop(listener, Arc::clone(&state), async {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.ends_with(br#"{"status":"ok"}"#) {
            let n = stream.read(&mut buf).await.unwrap();
            assert_ne!(n, 0, "connection closed before the response arrived");
            received.extend_from_slice(&buf[..n]);
        }
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 1);

        stop_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("idle connection held up shutdown")
            .unwrap();
        assert_eq!(state.active_connections.load(Ordering::SeqCst), 0);
        assert_eq!(stream.read(&mut buf).await.unwrap(), 0);
    }
}
