//! Context lifecycle and option management.
//!
//! A [`Context`] owns exactly one engine context. It is created live, and
//! [`shutdown`](Context::shutdown) or [`terminate`](Context::terminate) move
//! it to a permanently inert state. Dropping a live context terminates it;
//! a failure at that point is logged and swallowed.
//!
//! Sockets borrow the context. [`shutdown`](Context::shutdown) takes `&self`
//! so it can wake sockets that are still open; terminating takes `&mut self`,
//! so a context cannot be terminated (or dropped) while any of its sockets
//! exists.

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::engine::{Engine, RawContext, Version};
use crate::error::{EngineError, FerruleError, Result};
use crate::options::{self, ContextOption, ContextOptions};
use crate::socket::Socket;
use crate::socket_type::SocketType;

#[cfg(feature = "libzmq")]
use crate::engine::LibZmq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Live(RawContext),
    /// Shut down; the engine still owns the instance until it is terminated
    /// on drop. Never used for any other call.
    ShutDown(RawContext),
    Absent,
}

/// A handle to one engine context.
#[derive(Debug)]
pub struct Context<E: Engine> {
    engine: E,
    state: Mutex<HandleState>,
}

#[cfg(feature = "libzmq")]
impl Context<LibZmq> {
    /// Create a context on the linked libzmq.
    ///
    /// # Errors
    ///
    /// `ContextCreationFailed` if `zmq_ctx_new` fails.
    pub fn new() -> Result<Self> {
        Self::with_engine(LibZmq)
    }

    /// Create a context on the linked libzmq and apply `opts` to it.
    pub fn with_options(opts: &ContextOptions) -> Result<Self> {
        Self::with_engine_and_options(LibZmq, opts)
    }
}

impl<E: Engine> Context<E> {
    /// Create a context on `engine`.
    ///
    /// # Errors
    ///
    /// `ContextCreationFailed` carrying the engine's last error if the engine
    /// refuses to allocate. Nothing is retained in that case.
    pub fn with_engine(engine: E) -> Result<Self> {
        let raw = engine
            .new_context()
            .map_err(FerruleError::ContextCreationFailed)?;
        debug!(context = ?raw, "Context created");
        Ok(Self {
            engine,
            state: Mutex::new(HandleState::Live(raw)),
        })
    }

    /// Create a context on `engine` and apply `opts` to it.
    ///
    /// If any option is rejected the new context is terminated before the
    /// error is returned.
    pub fn with_engine_and_options(engine: E, opts: &ContextOptions) -> Result<Self> {
        let mut ctx = Self::with_engine(engine)?;
        if let Err(e) = ctx.apply(opts) {
            if let Err(term) = ctx.terminate() {
                error!(error = %term, "Failed to terminate context after rejected options");
            }
            return Err(e);
        }
        Ok(ctx)
    }

    /// Whether the context still refers to a running engine instance.
    pub fn is_live(&self) -> bool {
        matches!(*self.state.lock(), HandleState::Live(_))
    }

    /// The engine handle, or `None` once shut down or terminated.
    pub fn raw(&self) -> Option<RawContext> {
        match *self.state.lock() {
            HandleState::Live(raw) => Some(raw),
            HandleState::ShutDown(_) | HandleState::Absent => None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Version of the engine behind this context.
    pub fn engine_version(&self) -> Version {
        self.engine.version()
    }

    /// Stop the context from accepting new work.
    ///
    /// Blocking calls on its sockets return `ETERM` and new sockets can no
    /// longer be created. Sockets that are still open stay usable for closing
    /// and are closed when dropped. Once shut down the context is inert. A
    /// no-op on a context that is not live.
    ///
    /// # Errors
    ///
    /// `ContextOperationFailed` if the engine refuses; the context stays live.
    pub fn shutdown(&self) -> Result<()> {
        let mut state = self.state.lock();
        let HandleState::Live(raw) = *state else {
            return Ok(());
        };
        self.engine
            .shutdown_context(raw)
            .map_err(FerruleError::ContextOperationFailed)?;
        debug!(context = ?raw, "Context shut down");
        *state = HandleState::ShutDown(raw);
        Ok(())
    }

    /// Terminate the context, releasing the engine instance.
    ///
    /// Blocks until every socket of the context is closed and its linger
    /// period has elapsed. A no-op on a context that is not live.
    ///
    /// # Errors
    ///
    /// `ContextOperationFailed` if the engine refuses (for example `EINTR`);
    /// the context stays live and the call may be repeated.
    pub fn terminate(&mut self) -> Result<()> {
        let state = self.state.get_mut();
        let HandleState::Live(raw) = *state else {
            return Ok(());
        };
        self.engine
            .terminate_context(raw)
            .map_err(FerruleError::ContextOperationFailed)?;
        debug!(context = ?raw, "Context terminated");
        *state = HandleState::Absent;
        Ok(())
    }

    /// Open a socket of `kind` on this context.
    ///
    /// Failures come straight from [`Socket::new`].
    pub fn socket(&self, kind: SocketType) -> Result<Socket<'_, E>> {
        Socket::new(self, kind)
    }

    /// Apply every set field of `opts`, stopping at the first rejection.
    pub fn apply(&self, opts: &ContextOptions) -> Result<()> {
        for (option, value) in opts.entries() {
            self.set_option(option, value)?;
        }
        Ok(())
    }

    fn live(&self) -> Result<RawContext> {
        self.raw()
            .ok_or_else(|| FerruleError::ContextOperationFailed(EngineError::context_not_live()))
    }

    fn get_option(&self, option: ContextOption) -> Result<i32> {
        debug_assert!(option.access().readable(), "{} is write-only", option.name());
        let raw = self.live()?;
        let value = self
            .engine
            .context_get(raw, option.id())
            .map_err(FerruleError::ContextOperationFailed)?;
        trace!(option = option.name(), value, "Context option read");
        Ok(value)
    }

    fn set_option(&self, option: ContextOption, value: i32) -> Result<()> {
        debug_assert!(option.access().writable(), "{} is read-only", option.name());
        let raw = self.live()?;
        self.engine
            .context_set(raw, option.id(), value)
            .map_err(FerruleError::ContextOperationFailed)?;
        trace!(option = option.name(), value, "Context option set");
        Ok(())
    }

    /// Number of I/O threads.
    pub fn io_threads(&self) -> Result<i32> {
        self.get_option(ContextOption::IoThreads)
    }

    /// Set the number of I/O threads. Pass [`DEFAULT_IO_THREADS`] to restore
    /// the default.
    ///
    /// Only takes effect if set before the first socket is created.
    ///
    /// [`DEFAULT_IO_THREADS`]: options::DEFAULT_IO_THREADS
    pub fn set_io_threads(&self, threads: i32) -> Result<()> {
        self.set_option(ContextOption::IoThreads, threads)
    }

    /// Set the OS scheduling policy of the I/O threads. Write-only.
    ///
    /// Leave unset to keep the default, [`DEFAULT_THREAD_SCHED_POLICY`]
    /// (inherit from the process); the engine rejects that value as input.
    ///
    /// [`DEFAULT_THREAD_SCHED_POLICY`]: options::DEFAULT_THREAD_SCHED_POLICY
    pub fn set_thread_sched_policy(&self, policy: i32) -> Result<()> {
        self.set_option(ContextOption::ThreadSchedPolicy, policy)
    }

    /// Set the OS priority of the I/O threads. Write-only.
    ///
    /// Leave unset to keep the default, [`DEFAULT_THREAD_PRIORITY`] (inherit
    /// from the process); the engine rejects that value as input.
    ///
    /// [`DEFAULT_THREAD_PRIORITY`]: options::DEFAULT_THREAD_PRIORITY
    pub fn set_thread_priority(&self, priority: i32) -> Result<()> {
        self.set_option(ContextOption::ThreadPriority, priority)
    }

    /// Maximum number of sockets.
    pub fn max_sockets(&self) -> Result<i32> {
        self.get_option(ContextOption::MaxSockets)
    }

    /// Set the maximum number of sockets. Pass [`DEFAULT_MAX_SOCKETS`] for
    /// the conventional value.
    ///
    /// [`DEFAULT_MAX_SOCKETS`]: options::DEFAULT_MAX_SOCKETS
    pub fn set_max_sockets(&self, max: i32) -> Result<()> {
        self.set_option(ContextOption::MaxSockets, max)
    }

    /// Whether IPv6 is enabled for sockets created afterwards.
    ///
    /// Only a raw 1 reads as enabled.
    pub fn is_ipv6_enabled(&self) -> Result<bool> {
        self.get_option(ContextOption::Ipv6).map(options::raw_to_bool)
    }

    /// Enable or disable IPv6. Pass [`DEFAULT_IPV6`] to restore the default.
    ///
    /// [`DEFAULT_IPV6`]: options::DEFAULT_IPV6
    pub fn set_ipv6_enabled(&self, enabled: bool) -> Result<()> {
        self.set_option(ContextOption::Ipv6, options::bool_to_raw(enabled))
    }

    /// Largest number of sockets the platform allows. Read-only.
    pub fn socket_limit(&self) -> Result<i32> {
        self.get_option(ContextOption::SocketLimit)
    }

    /// Whether terminate waits for pending messages.
    pub fn is_blocky(&self) -> Result<bool> {
        self.get_option(ContextOption::Blocky).map(options::raw_to_bool)
    }

    /// Pass [`DEFAULT_BLOCKY`] to restore the default.
    ///
    /// [`DEFAULT_BLOCKY`]: options::DEFAULT_BLOCKY
    pub fn set_blocky(&self, blocky: bool) -> Result<()> {
        self.set_option(ContextOption::Blocky, options::bool_to_raw(blocky))
    }

    /// Largest message size in bytes accepted by sockets of this context.
    pub fn max_message_size(&self) -> Result<i32> {
        self.get_option(ContextOption::MaxMessageSize)
    }

    pub fn set_max_message_size(&self, bytes: i32) -> Result<()> {
        self.set_option(ContextOption::MaxMessageSize, bytes)
    }

    /// Size of the engine's message structure in bytes. Read-only.
    pub fn message_size(&self) -> Result<i32> {
        self.get_option(ContextOption::MessageSize)
    }

    /// Add `cpu` to the affinity set of the I/O threads. Write-only.
    pub fn add_thread_affinity_cpu(&self, cpu: i32) -> Result<()> {
        self.set_option(ContextOption::ThreadAffinityCpuAdd, cpu)
    }

    /// Remove `cpu` from the affinity set of the I/O threads. Write-only.
    pub fn remove_thread_affinity_cpu(&self, cpu: i32) -> Result<()> {
        self.set_option(ContextOption::ThreadAffinityCpuRemove, cpu)
    }

    /// Set the numeric prefix of I/O thread names. Write-only.
    pub fn set_thread_name_prefix(&self, prefix: i32) -> Result<()> {
        self.set_option(ContextOption::ThreadNamePrefix, prefix)
    }
}

/// Terminate `raw`, restarting on `EINTR` as libzmq allows.
fn release<E: Engine>(engine: &E, raw: RawContext) -> std::result::Result<(), EngineError> {
    loop {
        match engine.terminate_context(raw) {
            Err(e) if e.code == crate::error::errno::EINTR => {
                debug!(context = ?raw, "Context termination interrupted, retrying");
            }
            other => return other,
        }
    }
}

impl<E: Engine> Drop for Context<E> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let raw = match *state {
            HandleState::Live(raw) | HandleState::ShutDown(raw) => raw,
            HandleState::Absent => return,
        };
        match release(&self.engine, raw) {
            Ok(()) => {
                debug!(context = ?raw, "Context released on drop");
                *state = HandleState::Absent;
            }
            Err(e) => {
                error!(context = ?raw, error = %e, "Failed to terminate context on drop");
            }
        }
    }
}
