use may::coroutine::JoinHandle;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use super::middleware::Pipeline;
use super::request::ServerRequest;
use super::response::{status_reason, ServerResponse};

/// Adapts a [`Pipeline`] to `may_minihttp`'s service interface.
#[derive(Clone)]
pub struct PipelineService {
    pipeline: Arc<Pipeline>,
}

impl PipelineService {
    #[must_use]
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

impl HttpService for PipelineService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let method = match req.method().parse::<http::Method>() {
            Ok(method) => method,
            Err(_) => {
                warn!(method = %req.method(), "Unsupported request method");
                res.status_code(400, status_reason(400));
                return Ok(());
            }
        };
        let headers = req
            .headers()
            .iter()
            .map(|h| {
                (
                    h.name.to_string(),
                    String::from_utf8_lossy(h.value).into_owned(),
                )
            })
            .collect();
        let request = ServerRequest::with_headers(method, req.path(), headers);

        let response = self.pipeline.handle(&request);
        write_response(res, response);
        Ok(())
    }
}

fn write_response(res: &mut Response, response: ServerResponse) {
    let status = response.status();
    res.status_code(status as usize, status_reason(status));
    res.header(response.content_type().header_line());
    res.body_vec(response.into_body().into_bytes());
}

/// Wrapper around may_minihttp's HTTP server
pub struct HttpServer<T>(pub T);

/// Handle to a running HTTP server
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to be ready to accept connections
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` if the server doesn't become ready within ~250ms (50 attempts × 5ms).
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Stop the server by cancelling its coroutine and waiting for it to finish.
    pub fn stop(self) {
        // SAFETY: cancel() is unsafe in the may runtime; the handle is valid and
        // cancellation is the intended shutdown path.
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            warn!(addr = %self.addr, "Server coroutine ended with a panic");
        }
    }

    /// Block until the server coroutine completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start the HTTP server on the given address
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or the port cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        info!(addr = %addr, "HTTP server listening");
        Ok(ServerHandle { addr, handle })
    }
}
