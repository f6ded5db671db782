//! Socket type enumeration for libzmq socket types.
//!
//! This module provides the `SocketType` enum, the closed set of socket
//! patterns a `Context` can construct, and its mapping onto the integer
//! constants of libzmq's public protocol.

use std::fmt;

/// ZeroMQ socket types.
///
/// Passed to `zmq_socket` as its type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    /// REQ socket for synchronous request-reply client
    Req,

    /// REP socket for synchronous request-reply server
    Rep,

    /// ROUTER socket for routing messages by identity
    Router,

    /// DEALER socket for asynchronous request-reply patterns
    Dealer,
}

impl SocketType {
    /// Every variant, in `zmq.h` order.
    pub const ALL: [Self; 4] = [Self::Req, Self::Rep, Self::Dealer, Self::Router];

    /// The engine's integer constant for this socket type.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Req => 3,
            Self::Rep => 4,
            Self::Dealer => 5,
            Self::Router => 6,
        }
    }

    /// Reverse lookup of [`raw`](Self::raw).
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.raw() == raw)
    }

    /// Get the socket type as a string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Req => "REQ",
            Self::Rep => "REP",
            Self::Router => "ROUTER",
            Self::Dealer => "DEALER",
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_socket_type_display() {
        assert_eq!(SocketType::Dealer.to_string(), "DEALER");
        assert_eq!(SocketType::Router.to_string(), "ROUTER");
        assert_eq!(SocketType::Req.to_string(), "REQ");
    }

    #[test]
    fn test_raw_values_match_zmq_h() {
        assert_eq!(SocketType::Req.raw(), 3);
        assert_eq!(SocketType::Rep.raw(), 4);
        assert_eq!(SocketType::Dealer.raw(), 5);
        assert_eq!(SocketType::Router.raw(), 6);
    }

    #[test]
    fn test_raw_values_distinct_and_nonzero() {
        let raws: HashSet<i32> = SocketType::ALL.iter().map(|k| k.raw()).collect();
        assert_eq!(raws.len(), SocketType::ALL.len());
        assert!(raws.iter().all(|&r| r != 0));
    }

    #[test]
    fn test_from_raw() {
        for kind in SocketType::ALL {
            assert_eq!(SocketType::from_raw(kind.raw()), Some(kind));
        }
        // PAIR and PUB exist in libzmq but not in this registry
        assert_eq!(SocketType::from_raw(0), None);
        assert_eq!(SocketType::from_raw(1), None);
    }
}
