//! Coroutine HTTP server: one coroutine accepts, one coroutine serves each
//! connection until it closes.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream as StdTcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use may::coroutine::JoinHandle;
use may::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use super::request::{read_request, ParsedRequest};
use super::response::write_response;
use crate::handler::ResponseWriter;
use crate::router::Router;

/// Thin server wrapper binding a configured router to a listening socket.
pub struct HttpServer(pub Arc<Router>);

/// Handle to a running server.
///
/// The socket is bound and listening before [`HttpServer::start`] returns,
/// so callers can connect immediately; no readiness polling is needed.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting new connections and wait for the accept coroutine to
    /// exit. Connections already being served finish on their own
    /// coroutines.
    pub fn stop(self) {
        self.shutdown.store(true, Ordering::Release);
        // The accept loop only observes the flag between accepts, so poke
        // it awake with a throwaway connection.
        let _ = StdTcpStream::connect(self.addr);
        let _ = self.handle.join();
    }

    /// Block until the accept coroutine exits.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl HttpServer {
    /// Bind `addr` and start accepting connections.
    ///
    /// Pass port zero to let the OS choose; the bound address is available
    /// through [`ServerHandle::addr`].
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let listener = TcpListener::bind(addr)?;
        let addr = listener.local_addr()?;
        let router = self.0;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let handle = may::go!(move || {
            for stream in listener.incoming() {
                if shutdown_flag.load(Ordering::Acquire) {
                    break;
                }
                match stream {
                    Ok(stream) => {
                        let router = Arc::clone(&router);
                        may::go!(move || {
                            if let Err(err) = serve_connection(router, stream) {
                                debug!(error = %err, "connection ended with error");
                            }
                        });
                    }
                    Err(err) => warn!(error = %err, "accept failed"),
                }
            }
        });

        Ok(ServerHandle {
            addr,
            shutdown,
            handle,
        })
    }
}

fn serve_connection(router: Arc<Router>, mut stream: TcpStream) -> io::Result<()> {
    let mut buf = Vec::with_capacity(4096);
    loop {
        let parsed = match read_request(&mut stream, &mut buf) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Ok(()),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                stream.write_all(
                    b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let ParsedRequest {
            mut request,
            keep_alive,
        } = parsed;

        let mut writer = ResponseWriter::new();
        router.route(&mut writer, &mut request);
        write_response(&mut stream, &writer, keep_alive)?;

        if !keep_alive {
            return Ok(());
        }
    }
}
