//! Engine sockets created from a [`Context`].
//!
//! The send/receive path and the pattern semantics belong to the engine.
//! A `Socket` only owns the engine handle, borrows the context it came
//! from, and exposes the linger period that decides how long terminating
//! that context may block.

use std::time::Duration;

use tracing::{debug, error};

use crate::context::Context;
use crate::engine::{Engine, RawSocket};
use crate::error::{EngineError, FerruleError, Result};
use crate::socket_type::SocketType;

/// ZMQ_LINGER
const LINGER: i32 = 17;

/// An open engine socket.
///
/// Closed on drop. The borrow on the context keeps the context alive, and
/// un-terminated, for as long as the socket exists. It does not keep it from
/// being shut down.
#[derive(Debug)]
pub struct Socket<'ctx, E: Engine> {
    context: &'ctx Context<E>,
    raw: RawSocket,
    kind: SocketType,
}

impl<'ctx, E: Engine> Socket<'ctx, E> {
    /// Open a socket of `kind` on `context`.
    ///
    /// # Errors
    ///
    /// `SocketCreationFailed` with `EFAULT` if the context has been shut down
    /// or terminated (the engine is not called), or with whatever the engine
    /// reports, e.g. `EMFILE` once `max_sockets` is reached.
    pub fn new(context: &'ctx Context<E>, kind: SocketType) -> Result<Self> {
        let ctx = context
            .raw()
            .ok_or_else(|| FerruleError::SocketCreationFailed(EngineError::context_not_live()))?;
        let raw = context
            .engine()
            .open_socket(ctx, kind.raw())
            .map_err(FerruleError::SocketCreationFailed)?;
        debug!(socket = ?raw, %kind, "Socket opened");
        Ok(Self {
            context,
            raw,
            kind,
        })
    }

    pub fn kind(&self) -> SocketType {
        self.kind
    }

    pub fn context(&self) -> &'ctx Context<E> {
        self.context
    }

    pub fn raw(&self) -> RawSocket {
        self.raw
    }

    /// Linger period. `None` means wait forever.
    pub fn linger(&self) -> Result<Option<Duration>> {
        let millis = self
            .context
            .engine()
            .socket_get(self.raw(), LINGER)
            .map_err(FerruleError::SocketOperationFailed)?;
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }

    /// Set the linger period. `None` waits forever, `Some(Duration::ZERO)`
    /// discards pending messages at close. Saturates at `i32::MAX` ms.
    pub fn set_linger(&self, linger: Option<Duration>) -> Result<()> {
        let millis = linger.map_or(-1, |d| i32::try_from(d.as_millis()).unwrap_or(i32::MAX));
        self.context
            .engine()
            .socket_set(self.raw(), LINGER, millis)
            .map_err(FerruleError::SocketOperationFailed)
    }

    /// Close the socket, reporting failure instead of logging it.
    ///
    /// The handle is given up either way; a failed close is not retried on
    /// drop.
    pub fn close(self) -> Result<()> {
        let (context, raw, kind) = (self.context, self.raw, self.kind);
        // Skip Drop; the close below is the only cleanup.
        std::mem::forget(self);
        context
            .engine()
            .close_socket(raw)
            .map_err(FerruleError::SocketOperationFailed)?;
        debug!(socket = ?raw, %kind, "Socket closed");
        Ok(())
    }
}

impl<E: Engine> Drop for Socket<'_, E> {
    fn drop(&mut self) {
        match self.context.engine().close_socket(self.raw) {
            Ok(()) => debug!(socket = ?self.raw, kind = %self.kind, "Socket closed on drop"),
            Err(e) => error!(socket = ?self.raw, error = %e, "Failed to close socket on drop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Call, MemoryEngine};
    use crate::error::errno;

    #[test]
    fn test_socket_borrows_context() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine.clone()).unwrap();

        let socket = ctx.socket(SocketType::Dealer).unwrap();
        assert_eq!(socket.kind(), SocketType::Dealer);
        assert!(socket.context().is_live());
        assert_eq!(engine.open_sockets(), 1);

        drop(socket);
        assert_eq!(engine.open_sockets(), 0);
    }

    #[test]
    fn test_every_type_opens() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine.clone()).unwrap();

        let sockets: Vec<_> = SocketType::ALL
            .iter()
            .map(|&kind| ctx.socket(kind).unwrap())
            .collect();
        assert_eq!(engine.open_sockets(), 4);
        drop(sockets);
        assert_eq!(engine.open_sockets(), 0);
    }

    #[test]
    fn test_socket_after_shutdown_fails_without_engine_call() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine.clone()).unwrap();
        ctx.shutdown().unwrap();

        let err = ctx.socket(SocketType::Rep).unwrap_err();
        assert!(matches!(err, FerruleError::SocketCreationFailed(_)));
        assert_eq!(err.code(), errno::EFAULT);
        assert_eq!(engine.calls(Call::OpenSocket), 0);
    }

    #[test]
    fn test_engine_refusal_is_propagated() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine.clone()).unwrap();
        ctx.set_max_sockets(1).unwrap();

        let _first = ctx.socket(SocketType::Req).unwrap();
        let err = ctx.socket(SocketType::Req).unwrap_err();
        assert!(matches!(err, FerruleError::SocketCreationFailed(_)));
        assert_eq!(err.code(), errno::EMFILE);
    }

    #[test]
    fn test_linger_round_trip() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine).unwrap();
        let socket = ctx.socket(SocketType::Router).unwrap();

        assert_eq!(socket.linger().unwrap(), None);
        socket.set_linger(Some(Duration::from_millis(250))).unwrap();
        assert_eq!(socket.linger().unwrap(), Some(Duration::from_millis(250)));
        socket.set_linger(Some(Duration::ZERO)).unwrap();
        assert_eq!(socket.linger().unwrap(), Some(Duration::ZERO));
        socket.set_linger(None).unwrap();
        assert_eq!(socket.linger().unwrap(), None);
    }

    #[test]
    fn test_explicit_close_reports_failure() {
        let engine = MemoryEngine::new();
        let ctx = Context::with_engine(engine.clone()).unwrap();
        let socket = ctx.socket(SocketType::Req).unwrap();

        engine.fail_next(Call::CloseSocket, errno::EINTR);
        let err = socket.close().unwrap_err();
        assert!(matches!(err, FerruleError::SocketOperationFailed(_)));
        // Nothing is closed again on drop.
        assert_eq!(engine.calls(Call::CloseSocket), 1);
    }

    #[test]
    fn test_close_then_terminate() {
        let engine = MemoryEngine::new();
        let mut ctx = Context::with_engine(engine.clone()).unwrap();
        ctx.socket(SocketType::Req).unwrap().close().unwrap();

        ctx.terminate().unwrap();
        assert_eq!(engine.live_contexts(), 0);
    }
}
