//! Ferrule Core
//!
//! This crate contains the building blocks of the libzmq binding:
//! - Context lifecycle and option protocol (`context`)
//! - Typed context option identifiers and the options builder (`options`)
//! - Socket type registry (`socket_type`)
//! - Engine sockets borrowed from a context (`socket`)
//! - The engine seam, with the libzmq and in-memory engines (`engine`)
//! - Error types (`error`)

// Raw FFI is confined to `engine::libzmq` and the handle marker impls
#![deny(unsafe_code)]
// Allow some pedantic lints that are intentional in this crate
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod context;
pub mod engine;
pub mod error;
pub mod options;
pub mod socket;
pub mod socket_type;

pub use error::{errno, EngineError, FerruleError, Result};

// Optional: a small prelude to make downstream crates ergonomic.
// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::context::Context;
    pub use crate::engine::{Engine, MemoryEngine, RawContext, RawSocket, Version};
    pub use crate::error::{FerruleError, Result};
    pub use crate::options::ContextOptions;
    pub use crate::socket::Socket;
    pub use crate::socket_type::SocketType;

    #[cfg(feature = "libzmq")]
    pub use crate::engine::LibZmq;
}
