//! # Ferrule
//!
//! Safe Rust bindings for libzmq contexts.
//!
//! ## Architecture
//!
//! Ferrule is a thin layer over the native engine:
//!
//! - **`ferrule-core`**: context lifecycle, option protocol, socket types and
//!   the `Engine` seam
//! - **`ferrule`**: Public API surface (this crate)
//!
//! Message transport, the wire protocol and the socket patterns all live in
//! libzmq. Ferrule only owns handles and forwards calls.
//!
//! ## Engines (opt-in via features)
//!
//! - **`libzmq`** (default) - link the C library through `zmq-sys`
//!
//! Without it, only the in-memory engine is available.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "libzmq")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use ferrule::prelude::*;
//!
//! let ctx = Context::new()?;
//! ctx.set_io_threads(4)?;
//! ctx.set_ipv6_enabled(true)?;
//!
//! let router = ctx.socket(SocketType::Router)?;
//! router.set_linger(Some(std::time::Duration::ZERO))?;
//! drop(router);
//!
//! // Dropping the context terminates it; call terminate() to see the error.
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuring at creation
//!
//! ```rust,no_run
//! # #[cfg(feature = "libzmq")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use ferrule::prelude::*;
//!
//! let opts = ContextOptions::new().with_io_threads(2).with_max_sockets(256);
//! let mut ctx = Context::with_options(&opts)?;
//! ctx.terminate()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! - `unsafe` code is isolated to `ferrule-core/src/engine/libzmq.rs` and the
//!   `Send`/`Sync` markers on the raw handles
//! - Sockets borrow their context, so a context can never be terminated
//!   while one of its sockets is open. Shutdown only needs `&self` and can
//!   run while sockets are still open

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Tracing setup for tests, benches and examples.
pub mod dev_tracing;

pub use ferrule_core::engine::{self, Engine, MemoryEngine, RawContext, RawSocket, Version};
pub use ferrule_core::error::{errno, EngineError, FerruleError, Result};
pub use ferrule_core::options::{self, ContextOption, ContextOptions};
pub use ferrule_core::socket_type::SocketType;

#[cfg(feature = "libzmq")]
pub use ferrule_core::engine::LibZmq;

/// A context on the linked libzmq.
#[cfg(feature = "libzmq")]
pub type Context = ferrule_core::context::Context<LibZmq>;

/// A socket on the linked libzmq.
#[cfg(feature = "libzmq")]
pub type Socket<'ctx> = ferrule_core::socket::Socket<'ctx, LibZmq>;

/// A context over any engine.
pub type EngineContext<E> = ferrule_core::context::Context<E>;

/// A socket over any engine.
pub type EngineSocket<'ctx, E> = ferrule_core::socket::Socket<'ctx, E>;

#[cfg(feature = "libzmq")]
static LIBZMQ_VERSION: once_cell::sync::Lazy<Version> =
    once_cell::sync::Lazy::new(|| LibZmq.version());

/// Version of the linked libzmq, read once.
#[cfg(feature = "libzmq")]
pub fn version() -> Version {
    *LIBZMQ_VERSION
}

/// Convenient imports.
///
/// # Example
///
/// ```rust
/// use ferrule::prelude::*;
///
/// // Now you have:
/// // - Context, Socket, SocketType, ContextOptions
/// // - FerruleError and Result
/// ```
pub mod prelude {
    pub use super::{ContextOptions, Engine, FerruleError, Result, SocketType};

    #[cfg(feature = "libzmq")]
    pub use super::{Context, Socket};
}
