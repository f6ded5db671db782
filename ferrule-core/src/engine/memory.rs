//! In-process engine.
//!
//! Keeps contexts and sockets in a table and applies libzmq 4.3's option
//! rules: the same defaults, the same accepted ranges and the same error
//! codes. There are no I/O threads, so terminating a context that still has
//! open sockets fails with `EBUSY` instead of blocking.
//!
//! Failures can be scripted per call kind with [`MemoryEngine::fail_next`],
//! and every call is counted.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::ffi::c_void;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Engine, RawContext, RawSocket, Version};
use crate::error::{errno, EngineError};
use crate::options::ContextOption;

/// ZMQ_TYPE
const SOCKOPT_TYPE: i32 = 16;
/// ZMQ_LINGER
const SOCKOPT_LINGER: i32 = 17;
/// Highest socket type libzmq knows (ZMQ_STREAM).
const MAX_SOCKET_TYPE: i32 = 11;
/// What libzmq reports for ZMQ_SOCKET_LIMIT on epoll platforms.
const SOCKET_LIMIT: i32 = 65_535;
/// libzmq's ZMQ_MAX_SOCKETS_DFLT.
const ENGINE_MAX_SOCKETS: i32 = 1023;
/// sizeof(zmq_msg_t)
const MSG_T_SIZE: i32 = 64;

/// Engine entry points, used to script failures and read call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    NewContext,
    ShutdownContext,
    TerminateContext,
    ContextGet,
    ContextSet,
    OpenSocket,
    CloseSocket,
    SocketGet,
    SocketSet,
}

#[derive(Debug)]
struct ContextState {
    io_threads: i32,
    max_sockets: i32,
    ipv6: bool,
    blocky: bool,
    max_msgsz: i32,
    thread_priority: i32,
    thread_sched_policy: i32,
    thread_name_prefix: i32,
    affinity: BTreeSet<i32>,
    shut_down: bool,
    open_sockets: usize,
}

impl ContextState {
    fn new() -> Self {
        Self {
            io_threads: 1,
            max_sockets: ENGINE_MAX_SOCKETS,
            ipv6: false,
            blocky: true,
            max_msgsz: i32::MAX,
            thread_priority: -1,
            thread_sched_policy: -1,
            thread_name_prefix: -1,
            affinity: BTreeSet::new(),
            shut_down: false,
            open_sockets: 0,
        }
    }

    fn get(&self, option: i32) -> Result<i32, EngineError> {
        let value = match option {
            o if o == ContextOption::IoThreads.id() => self.io_threads,
            o if o == ContextOption::MaxSockets.id() => self.max_sockets,
            o if o == ContextOption::SocketLimit.id() => SOCKET_LIMIT,
            o if o == ContextOption::Ipv6.id() => i32::from(self.ipv6),
            o if o == ContextOption::Blocky.id() => i32::from(self.blocky),
            o if o == ContextOption::MaxMessageSize.id() => self.max_msgsz,
            o if o == ContextOption::MessageSize.id() => MSG_T_SIZE,
            _ => return Err(EngineError::from_code(errno::EINVAL)),
        };
        Ok(value)
    }

    fn set(&mut self, option: i32, value: i32) -> Result<(), EngineError> {
        let invalid = || EngineError::from_code(errno::EINVAL);
        // Every context option rejects negative values.
        if value < 0 {
            return Err(invalid());
        }
        match option {
            o if o == ContextOption::IoThreads.id() => self.io_threads = value,
            o if o == ContextOption::MaxSockets.id() => {
                if value < 1 {
                    return Err(invalid());
                }
                self.max_sockets = value;
            }
            o if o == ContextOption::ThreadPriority.id() => self.thread_priority = value,
            o if o == ContextOption::ThreadSchedPolicy.id() => self.thread_sched_policy = value,
            o if o == ContextOption::MaxMessageSize.id() => self.max_msgsz = value,
            o if o == ContextOption::ThreadAffinityCpuAdd.id() => {
                self.affinity.insert(value);
            }
            o if o == ContextOption::ThreadAffinityCpuRemove.id() => {
                if !self.affinity.remove(&value) {
                    return Err(invalid());
                }
            }
            o if o == ContextOption::ThreadNamePrefix.id() => self.thread_name_prefix = value,
            o if o == ContextOption::Ipv6.id() => self.ipv6 = value != 0,
            o if o == ContextOption::Blocky.id() => self.blocky = value != 0,
            _ => return Err(invalid()),
        }
        Ok(())
    }
}

#[derive(Debug)]
struct SocketState {
    context: usize,
    kind: i32,
    linger: i32,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: usize,
    contexts: HashMap<usize, ContextState>,
    sockets: HashMap<usize, SocketState>,
    faults: HashMap<Call, VecDeque<i32>>,
    calls: HashMap<Call, usize>,
}

impl Inner {
    /// Count the call and pop a scripted failure, if any.
    fn enter(&mut self, call: Call) -> Result<(), EngineError> {
        *self.calls.entry(call).or_default() += 1;
        match self.faults.get_mut(&call).and_then(VecDeque::pop_front) {
            Some(code) => Err(EngineError::from_code(code)),
            None => Ok(()),
        }
    }

    fn allocate(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn context(&mut self, ctx: RawContext) -> Result<&mut ContextState, EngineError> {
        self.contexts
            .get_mut(&key(ctx.as_ptr()))
            .ok_or_else(|| EngineError::from_code(errno::EFAULT))
    }

    fn socket(&mut self, socket: RawSocket) -> Result<&mut SocketState, EngineError> {
        self.sockets
            .get_mut(&key(socket.as_ptr()))
            .ok_or_else(|| EngineError::from_code(libc::ENOTSOCK))
    }
}

// Handles are table keys dressed up as pointers; they are never dereferenced.
fn handle(id: usize) -> *mut c_void {
    id as *mut c_void
}

fn key(ptr: *mut c_void) -> usize {
    ptr as usize
}

/// An engine that lives entirely in process memory.
///
/// Clones share the same tables, so a test can keep one clone for
/// inspection while a `Context` owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `call` fail with `code`. Queued failures are consumed
    /// in order, one per call.
    pub fn fail_next(&self, call: Call, code: i32) {
        self.inner
            .lock()
            .faults
            .entry(call)
            .or_default()
            .push_back(code);
    }

    /// How many times `call` has been made, failed attempts included.
    pub fn calls(&self, call: Call) -> usize {
        self.inner.lock().calls.get(&call).copied().unwrap_or(0)
    }

    /// Contexts allocated and not yet terminated.
    pub fn live_contexts(&self) -> usize {
        self.inner.lock().contexts.len()
    }

    /// Sockets opened and not yet closed, across all contexts.
    pub fn open_sockets(&self) -> usize {
        self.inner.lock().sockets.len()
    }

    /// Whether `ctx` has been shut down but not yet terminated.
    pub fn is_shut_down(&self, ctx: RawContext) -> bool {
        self.inner
            .lock()
            .contexts
            .get(&key(ctx.as_ptr()))
            .map_or(false, |state| state.shut_down)
    }
}

impl Engine for MemoryEngine {
    fn new_context(&self) -> Result<RawContext, EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::NewContext)?;
        let id = inner.allocate();
        inner.contexts.insert(id, ContextState::new());
        RawContext::from_ptr(handle(id)).ok_or_else(|| EngineError::from_code(errno::ENOMEM))
    }

    fn shutdown_context(&self, ctx: RawContext) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::ShutdownContext)?;
        inner.context(ctx)?.shut_down = true;
        Ok(())
    }

    fn terminate_context(&self, ctx: RawContext) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::TerminateContext)?;
        if inner.context(ctx)?.open_sockets > 0 {
            return Err(EngineError::from_code(libc::EBUSY));
        }
        inner.contexts.remove(&key(ctx.as_ptr()));
        Ok(())
    }

    fn context_get(&self, ctx: RawContext, option: i32) -> Result<i32, EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::ContextGet)?;
        inner.context(ctx)?.get(option)
    }

    fn context_set(&self, ctx: RawContext, option: i32, value: i32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::ContextSet)?;
        inner.context(ctx)?.set(option, value)
    }

    fn open_socket(&self, ctx: RawContext, kind: i32) -> Result<RawSocket, EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::OpenSocket)?;
        let state = inner.context(ctx)?;
        if state.shut_down {
            return Err(EngineError::from_code(errno::ETERM));
        }
        if !(0..=MAX_SOCKET_TYPE).contains(&kind) {
            return Err(EngineError::from_code(errno::EINVAL));
        }
        let limit = usize::try_from(state.max_sockets).unwrap_or(0);
        if state.open_sockets >= limit {
            return Err(EngineError::from_code(errno::EMFILE));
        }
        state.open_sockets += 1;

        let id = inner.allocate();
        inner.sockets.insert(
            id,
            SocketState {
                context: key(ctx.as_ptr()),
                kind,
                linger: -1,
            },
        );
        RawSocket::from_ptr(handle(id)).ok_or_else(|| EngineError::from_code(errno::ENOMEM))
    }

    fn close_socket(&self, socket: RawSocket) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::CloseSocket)?;
        let context = inner.socket(socket)?.context;
        inner.sockets.remove(&key(socket.as_ptr()));
        if let Some(state) = inner.contexts.get_mut(&context) {
            state.open_sockets -= 1;
        }
        Ok(())
    }

    fn socket_get(&self, socket: RawSocket, option: i32) -> Result<i32, EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::SocketGet)?;
        let state = inner.socket(socket)?;
        match option {
            SOCKOPT_TYPE => Ok(state.kind),
            SOCKOPT_LINGER => Ok(state.linger),
            _ => Err(EngineError::from_code(errno::EINVAL)),
        }
    }

    fn socket_set(&self, socket: RawSocket, option: i32, value: i32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        inner.enter(Call::SocketSet)?;
        let state = inner.socket(socket)?;
        match option {
            SOCKOPT_LINGER if value >= -1 => {
                state.linger = value;
                Ok(())
            }
            _ => Err(EngineError::from_code(errno::EINVAL)),
        }
    }

    fn version(&self) -> Version {
        Version {
            major: 4,
            minor: 3,
            patch: 5,
        }
    }
}
