//! Purpose: One blocking HTTP GET behind a small trait seam.
//! Exports: `Transport`, `HttpResponse`, `UreqTransport`.
//! Role: Lets the dump pipeline run against ureq in production and a mock in tests.
//! Invariants: Any status code is returned as `Ok`; only transport faults are `Err`.
//! Invariants: No request headers or body are added beyond the client's defaults.
use std::io::Read;

use url::Url;

use crate::error::{Error, ErrorKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

pub trait Transport {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        let response = match self.agent.get(url.as_str()).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(err)) => {
                return Err(Error::new(ErrorKind::Network)
                    .with_message(format!("request to {url} failed"))
                    .with_hint("Check network connectivity and that the host is reachable.")
                    .with_source(err));
            }
        };

        let status = response.status();
        // `into_string` caps bodies at 10 MB; a full listings page can exceed that.
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| {
                Error::new(ErrorKind::Network)
                    .with_message("failed to read response body")
                    .with_status(status)
                    .with_source(err)
            })?;
        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::{Transport, UreqTransport};
    use crate::error::ErrorKind;
    use std::net::TcpListener;

    #[test]
    fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let url = url::Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
        let err = UreqTransport::new().get(&url).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Network);
    }
}
