//! Server endpoint parsing and formatting.
//!
//! Users enter the server address as a single `host:port` string (exactly
//! what the handheld apps' connect screen asks for).  [`Endpoint`] validates
//! that string once, up front, so the session layer never has to deal with a
//! malformed address after construction.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A malformed `host:port` string, rejected before any transport attempt.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid endpoint '{input}': {reason}")]
pub struct EndpointError {
    /// The string that failed to parse (trimmed).
    pub input: String,
    /// Human-readable description of what is wrong with it.
    pub reason: &'static str,
}

impl EndpointError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A validated server address: host plus TCP port.
///
/// Immutable once constructed.  `Display` renders the normalized
/// `host:port` form, so `format(parse(s)) == normalize(s)` holds for every
/// valid input (normalization strips surrounding whitespace).
///
/// # Examples
///
/// ```rust
/// use remote_core::Endpoint;
///
/// let ep: Endpoint = "192.168.1.10:9876".parse().unwrap();
/// assert_eq!(ep.host(), "192.168.1.10");
/// assert_eq!(ep.port(), 9876);
/// assert_eq!(ep.ws_url(), "ws://192.168.1.10:9876");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// The host part (IP address or name), never empty.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port part, always in `1..=65535`.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The WebSocket URL the transport dials: `ws://host:port`.
    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    /// Parses a trimmed `host:port` string.
    ///
    /// The split happens on the *last* colon so a stray trailing `:port`
    /// never ends up inside the host.  Hosts containing a colon themselves
    /// (unbracketed IPv6 literals) are rejected as ambiguous rather than
    /// guessed at.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError`] when the separator is missing, the host is
    /// empty or ambiguous, or the port is not in `1..=65535`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let (host, port_str) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| EndpointError::new(trimmed, "expected 'host:port'"))?;

        if host.is_empty() {
            return Err(EndpointError::new(trimmed, "host must not be empty"));
        }
        if host.contains(':') {
            return Err(EndpointError::new(
                trimmed,
                "host must not contain ':' (bracketed IPv6 is not supported)",
            ));
        }

        let port: u16 = port_str
            .parse()
            .map_err(|_| EndpointError::new(trimmed, "port must be an integer in 1..=65535"))?;
        if port == 0 {
            return Err(EndpointError::new(trimmed, "port must not be 0"));
        }

        Ok(Endpoint {
            host: host.to_string(),
            port,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_endpoint() {
        let ep: Endpoint = "10.0.0.5:8765".parse().unwrap();
        assert_eq!(ep.host(), "10.0.0.5");
        assert_eq!(ep.port(), 8765);
    }

    #[test]
    fn test_parse_hostname_endpoint() {
        let ep: Endpoint = "desktop.local:9876".parse().unwrap();
        assert_eq!(ep.host(), "desktop.local");
        assert_eq!(ep.port(), 9876);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        // Connect screens hand us whatever the user typed, spaces included.
        let ep: Endpoint = "  192.168.1.2:9876\n".parse().unwrap();
        assert_eq!(ep.to_string(), "192.168.1.2:9876");
    }

    #[test]
    fn test_display_is_inverse_of_parse() {
        for input in ["10.0.0.5:8765", "localhost:1", "pc:65535"] {
            let ep: Endpoint = input.parse().unwrap();
            assert_eq!(ep.to_string(), input, "parse/format must round-trip");
        }
    }

    #[test]
    fn test_ws_url_format() {
        let ep: Endpoint = "10.0.0.5:8765".parse().unwrap();
        assert_eq!(ep.ws_url(), "ws://10.0.0.5:8765");
    }

    #[test]
    fn test_missing_port_is_rejected() {
        let result = "justahost".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let result = ":8765".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_string_is_rejected() {
        let result = "".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let result = "host:0".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_port_out_of_range_is_rejected() {
        let result = "host:65536".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_port_is_rejected() {
        let result = "host:abc".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_unbracketed_ipv6_is_rejected() {
        // `::1:8765` is ambiguous between host and port parts; reject rather
        // than guess.
        let result = "::1:8765".parse::<Endpoint>();
        assert!(result.is_err());
    }

    #[test]
    fn test_error_carries_input_string() {
        let err = "bad".parse::<Endpoint>().unwrap_err();
        assert_eq!(err.input, "bad");
    }
}
