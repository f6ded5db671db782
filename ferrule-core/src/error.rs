/// Ferrule Error Types
///
/// Every failed engine call surfaces as one of these, carrying the code and
/// message the engine reported at the moment of failure.

use thiserror::Error;

/// Error codes reported by the engine.
///
/// The POSIX values come from the platform; `ETERM` and friends are libzmq's
/// own codes, offset from `ZMQ_HAUSNUMERO` exactly as `zmq.h` defines them.
pub mod errno {
    /// Base of the libzmq-specific error range.
    pub const ZMQ_HAUSNUMERO: i32 = 156_384_712;

    pub const EINTR: i32 = libc::EINTR;
    pub const ENOMEM: i32 = libc::ENOMEM;
    pub const EFAULT: i32 = libc::EFAULT;
    pub const EINVAL: i32 = libc::EINVAL;
    pub const EMFILE: i32 = libc::EMFILE;

    /// Finite state machine is in the wrong state.
    pub const EFSM: i32 = ZMQ_HAUSNUMERO + 51;
    /// The context was terminated.
    pub const ETERM: i32 = ZMQ_HAUSNUMERO + 53;
    /// No I/O thread available.
    pub const EMTHREAD: i32 = ZMQ_HAUSNUMERO + 54;
}

/// The engine's last error: numeric code plus human readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (errno {code})")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Build an error for `code` with the message libzmq would report.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        let message = match code {
            errno::EFSM => "Operation cannot be accomplished in current state".to_string(),
            errno::ETERM => "Context was terminated".to_string(),
            errno::EMTHREAD => "No thread available".to_string(),
            _ => std::io::Error::from_raw_os_error(code).to_string(),
        };
        Self { code, message }
    }

    /// The error reported when a call is attempted against a context that
    /// has been shut down, terminated or never came up.
    ///
    /// Mirrors what libzmq answers for an invalid context pointer.
    #[must_use]
    pub fn context_not_live() -> Self {
        Self::new(errno::EFAULT, "context is not live")
    }
}

/// Main error type for Ferrule operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FerruleError {
    /// The engine refused to allocate a new context
    #[error("context creation failed: {0}")]
    ContextCreationFailed(#[source] EngineError),

    /// Shutdown, terminate or an option call failed
    #[error("context operation failed: {0}")]
    ContextOperationFailed(#[source] EngineError),

    /// The engine refused to open a socket
    #[error("socket creation failed: {0}")]
    SocketCreationFailed(#[source] EngineError),

    /// A socket option call or close failed
    #[error("socket operation failed: {0}")]
    SocketOperationFailed(#[source] EngineError),
}

/// Result type alias for Ferrule operations
pub type Result<T> = std::result::Result<T, FerruleError>;

impl FerruleError {
    /// The engine error behind this failure.
    #[must_use]
    pub const fn engine_error(&self) -> &EngineError {
        match self {
            Self::ContextCreationFailed(e)
            | Self::ContextOperationFailed(e)
            | Self::SocketCreationFailed(e)
            | Self::SocketOperationFailed(e) => e,
        }
    }

    #[must_use]
    pub const fn code(&self) -> i32 {
        self.engine_error().code
    }

    /// Check if the engine reported that the context was terminated
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.code() == errno::ETERM
    }

    /// Check if the call was interrupted by a signal and may be restarted
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.code() == errno::EINTR
    }
}
