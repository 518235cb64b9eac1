//! Validated remote address.

use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::EndpointError;

/// A remote host (name or IP literal) and a non-zero TCP port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, EndpointError> {
        let host = host.into();
        if host.is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        if port == 0 {
            return Err(EndpointError::PortOutOfRange(0));
        }
        Ok(Self { host, port })
    }

    /// Build an endpoint from the raw command-line strings.
    pub fn parse(host: &str, port: &str) -> Result<Self, EndpointError> {
        let port: u32 = port
            .trim()
            .parse()
            .map_err(|_| EndpointError::InvalidPort(port.to_string()))?;
        let port = u16::try_from(port).map_err(|_| EndpointError::PortOutOfRange(port))?;
        Self::new(host, port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to every socket address the host maps to, in resolver order.
    pub fn resolve(&self) -> io::Result<Vec<SocketAddr>> {
        Ok((self.host.as_str(), self.port).to_socket_addrs()?.collect())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hostname_and_port() {
        let ep = Endpoint::parse("localhost", "9000").unwrap();
        assert_eq!(ep.host(), "localhost");
        assert_eq!(ep.port(), 9000);
        assert_eq!(ep.to_string(), "localhost:9000");
    }

    #[test]
    fn port_bounds() {
        assert!(Endpoint::parse("h", "1").is_ok());
        assert!(Endpoint::parse("h", "65535").is_ok());
        assert_eq!(
            Endpoint::parse("h", "0").unwrap_err(),
            EndpointError::PortOutOfRange(0)
        );
        assert_eq!(
            Endpoint::parse("h", "65536").unwrap_err(),
            EndpointError::PortOutOfRange(65536)
        );
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert_eq!(
            Endpoint::parse("h", "http").unwrap_err(),
            EndpointError::InvalidPort("http".into())
        );
        assert!(matches!(
            Endpoint::parse("h", "-1"),
            Err(EndpointError::InvalidPort(_))
        ));
    }

    #[test]
    fn rejects_empty_host() {
        assert_eq!(Endpoint::new("", 80).unwrap_err(), EndpointError::EmptyHost);
    }

    #[test]
    fn ipv6_literal_is_bracketed() {
        let ep = Endpoint::new("::1", 9000).unwrap();
        assert_eq!(ep.to_string(), "[::1]:9000");
    }

    #[test]
    fn resolves_ip_literal_without_dns() {
        let ep = Endpoint::new("127.0.0.1", 9000).unwrap();
        let addrs = ep.resolve().unwrap();
        assert_eq!(addrs, vec!["127.0.0.1:9000".parse::<SocketAddr>().unwrap()]);
    }
}
