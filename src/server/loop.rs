// Server loop module
// Accepts connections until shutdown, then drains the open ones

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::Shutdown;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Serve `listener` until `shutdown` fires
///
/// After the stop signal the listener is closed, open connections are asked
/// to finish their in-flight request, and the loop waits up to
/// `performance.shutdown_timeout` seconds for them before returning.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: &Shutdown,
) -> std::io::Result<()> {
    let mut stop = shutdown.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, shutdown.subscribe());
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = stop.wait() => break,
        }
    }

    drop(listener);
    logger::log_shutdown_started(state.connection_count());

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    if drain_connections(&state, grace).await {
        logger::log_shutdown_complete();
    } else {
        logger::log_shutdown_timeout(state.connection_count());
    }

    Ok(())
}

/// Wait until no connection is open; `false` if `grace` ran out first
async fn drain_connections(state: &AppState, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        if state.connection_count() == 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
