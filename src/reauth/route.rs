//! Network route of a failed request.

use std::fmt;
use std::net::SocketAddr;
use url::Url;

/// Where a challenged request was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    scheme: String,
    host: String,
    port: Option<u16>,
    remote_addr: Option<SocketAddr>,
}

impl Route {
    /// Derive the route from a request URL. The port falls back to the
    /// scheme's well-known port.
    pub fn for_url(url: &Url) -> Self {
        Self {
            scheme: url.scheme().to_string(),
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port_or_known_default(),
            remote_addr: None,
        }
    }

    /// Attach the socket address the connection actually reached.
    pub fn with_remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}
