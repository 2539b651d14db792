//! Review app server.

mod handlers;
mod response;
mod routes;
mod session;

pub use handlers::{handle, AppState, Incoming};
pub use session::SessionStore;

use std::error::Error;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use tiny_http::{Request, Server};

use crate::shutdown;

/// Largest request body read, in bytes.
const MAX_BODY: u64 = 2 * 1024 * 1024;

/// Bind and serve until Ctrl+C.
pub fn run(state: AppState, addr: SocketAddr, threads: usize) -> Result<(), Box<dyn Error>> {
    let server = Server::http(addr).map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    let server = Arc::new(server);
    shutdown::register_server(Arc::clone(&server));
    log::info!("serving on http://{}", addr);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()?;
    let state = Arc::new(state);

    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log::warn!("request error: {}", e);
            }
        });
    }

    log::info!("server stopped");
    Ok(())
}

fn handle_request(mut request: Request, state: &AppState) -> std::io::Result<()> {
    if shutdown::is_shutdown() {
        return response::Reply::new(503, response::PLAIN, "503 Service Unavailable").send(request);
    }

    let header = |name: &'static str| {
        request
            .headers()
            .iter()
            .find(|h| h.field.equiv(name))
            .map(|h| h.value.to_string())
    };
    let mut incoming = Incoming::new(request.method().clone(), request.url());
    incoming.cookie = header("Cookie");
    incoming.content_type = header("Content-Type");

    request
        .as_reader()
        .take(MAX_BODY)
        .read_to_end(&mut incoming.body)?;

    let reply = handle(state, &incoming);
    log::info!("{} {} {}", incoming.method, incoming.url, reply.status);
    reply.send(request)
}
