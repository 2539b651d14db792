//! Ctrl+C handling shared by the server and the import scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam_channel::{Receiver, Sender};
use tiny_http::Server;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static LISTENING: AtomicBool = AtomicBool::new(false);
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();
static CHANNEL: OnceLock<(Sender<()>, Receiver<()>)> = OnceLock::new();

fn channel() -> &'static (Sender<()>, Receiver<()>) {
    CHANNEL.get_or_init(crossbeam_channel::unbounded)
}

/// Install the Ctrl+C handler. Call once at program start.
///
/// Until a server or a scheduler registers, Ctrl+C exits immediately.
pub fn setup_shutdown_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if !LISTENING.load(Ordering::SeqCst) {
            std::process::exit(0);
        }

        log::info!("shutting down...");
        let _ = channel().0.send(());
        if let Some(server) = SERVER.get() {
            server.unblock();
        }
    })
}

/// Register the HTTP server so Ctrl+C unblocks its request loop.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
    LISTENING.store(true, Ordering::SeqCst);
}

/// Receive a message when Ctrl+C is pressed.
pub fn subscribe() -> Receiver<()> {
    LISTENING.store(true, Ordering::SeqCst);
    channel().1.clone()
}

/// Whether shutdown was requested.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
