//! The seam between the binding and the messaging engine.
//!
//! A [`Context`](crate::context::Context) never talks to libzmq directly; it
//! forwards through an [`Engine`], which names the handful of native calls
//! the binding consumes. Each call reports failure as an [`EngineError`]
//! holding the engine's last error code and message.
//!
//! - [`LibZmq`] forwards to the C library (feature `libzmq`).
//! - [`MemoryEngine`] keeps contexts and sockets in process memory and
//!   follows libzmq's option rules; it also injects failures on demand.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::error::EngineError;

#[cfg(feature = "libzmq")]
mod libzmq;
mod memory;

#[cfg(feature = "libzmq")]
pub use libzmq::LibZmq;
pub use memory::{Call, MemoryEngine};

/// Opaque handle to an engine context. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawContext(NonNull<c_void>);

// libzmq contexts are thread safe; the handle may cross threads freely.
#[allow(unsafe_code)]
unsafe impl Send for RawContext {}
#[allow(unsafe_code)]
unsafe impl Sync for RawContext {}

impl RawContext {
    /// Wrap a pointer returned by the engine; `None` for null.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Opaque handle to an engine socket. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawSocket(NonNull<c_void>);

// Sockets may migrate between threads; they must not be shared.
#[allow(unsafe_code)]
unsafe impl Send for RawSocket {}

impl RawSocket {
    /// Wrap a pointer returned by the engine; `None` for null.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Engine library version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The native calls a context and its sockets forward to.
///
/// Implementations translate the engine's failure sentinels (null handles,
/// `-1` status codes) into `Err`. A handle passed in was always produced by
/// the same engine and has not been released yet.
pub trait Engine {
    /// `zmq_ctx_new`
    fn new_context(&self) -> Result<RawContext, EngineError>;

    /// `zmq_ctx_shutdown`
    fn shutdown_context(&self, ctx: RawContext) -> Result<(), EngineError>;

    /// `zmq_ctx_term`. Blocks until every socket of `ctx` is closed and its
    /// linger period has elapsed.
    fn terminate_context(&self, ctx: RawContext) -> Result<(), EngineError>;

    /// `zmq_ctx_get`
    fn context_get(&self, ctx: RawContext, option: i32) -> Result<i32, EngineError>;

    /// `zmq_ctx_set`
    fn context_set(&self, ctx: RawContext, option: i32, value: i32) -> Result<(), EngineError>;

    /// `zmq_socket`
    fn open_socket(&self, ctx: RawContext, kind: i32) -> Result<RawSocket, EngineError>;

    /// `zmq_close`
    fn close_socket(&self, socket: RawSocket) -> Result<(), EngineError>;

    /// `zmq_getsockopt` for integer options.
    fn socket_get(&self, socket: RawSocket, option: i32) -> Result<i32, EngineError>;

    /// `zmq_setsockopt` for integer options.
    fn socket_set(&self, socket: RawSocket, option: i32, value: i32) -> Result<(), EngineError>;

    /// `zmq_version`
    fn version(&self) -> Version;
}
