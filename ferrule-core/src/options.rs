//! Context configuration options
//!
//! This module maps libzmq's context option protocol (zmq_ctx_set/zmq_ctx_get)
//! onto typed identifiers, and provides [`ContextOptions`], a builder for
//! tuning a context in one call.

/// Default number of I/O threads when none is given.
pub const DEFAULT_IO_THREADS: i32 = 1;

/// Default maximum number of sockets when none is given.
pub const DEFAULT_MAX_SOCKETS: i32 = 1024;

/// Default OS scheduling policy for I/O threads (-1 inherits from the process).
pub const DEFAULT_THREAD_SCHED_POLICY: i32 = -1;

/// Default OS priority for I/O threads (-1 inherits from the process).
pub const DEFAULT_THREAD_PRIORITY: i32 = -1;

/// Default dual-stack setting.
pub const DEFAULT_IPV6: bool = false;

/// Default blocking behaviour of `zmq_ctx_term`.
pub const DEFAULT_BLOCKY: bool = true;

/// Whether an option may be read, written, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    pub const fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// Context option identifiers.
///
/// `SocketLimit` and `ThreadPriority` share the integer 3 in `zmq.h`: the
/// engine reads the socket limit and writes the thread priority under the
/// same key, which is why neither has a counterpart accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextOption {
    /// ZMQ_IO_THREADS
    IoThreads,
    /// ZMQ_MAX_SOCKETS
    MaxSockets,
    /// ZMQ_SOCKET_LIMIT
    SocketLimit,
    /// ZMQ_THREAD_PRIORITY
    ThreadPriority,
    /// ZMQ_THREAD_SCHED_POLICY
    ThreadSchedPolicy,
    /// ZMQ_MAX_MSGSZ
    MaxMessageSize,
    /// ZMQ_MSG_T_SIZE
    MessageSize,
    /// ZMQ_THREAD_AFFINITY_CPU_ADD
    ThreadAffinityCpuAdd,
    /// ZMQ_THREAD_AFFINITY_CPU_REMOVE
    ThreadAffinityCpuRemove,
    /// ZMQ_THREAD_NAME_PREFIX
    ThreadNamePrefix,
    /// ZMQ_IPV6
    Ipv6,
    /// ZMQ_BLOCKY
    Blocky,
}

impl ContextOption {
    /// The engine's integer key for this option.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::IoThreads => 1,
            Self::MaxSockets => 2,
            Self::SocketLimit | Self::ThreadPriority => 3,
            Self::ThreadSchedPolicy => 4,
            Self::MaxMessageSize => 5,
            Self::MessageSize => 6,
            Self::ThreadAffinityCpuAdd => 7,
            Self::ThreadAffinityCpuRemove => 8,
            Self::ThreadNamePrefix => 9,
            Self::Ipv6 => 42,
            Self::Blocky => 70,
        }
    }

    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::IoThreads
            | Self::MaxSockets
            | Self::MaxMessageSize
            | Self::Ipv6
            | Self::Blocky => Access::ReadWrite,
            Self::SocketLimit | Self::MessageSize => Access::ReadOnly,
            Self::ThreadPriority
            | Self::ThreadSchedPolicy
            | Self::ThreadAffinityCpuAdd
            | Self::ThreadAffinityCpuRemove
            | Self::ThreadNamePrefix => Access::WriteOnly,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IoThreads => "ZMQ_IO_THREADS",
            Self::MaxSockets => "ZMQ_MAX_SOCKETS",
            Self::SocketLimit => "ZMQ_SOCKET_LIMIT",
            Self::ThreadPriority => "ZMQ_THREAD_PRIORITY",
            Self::ThreadSchedPolicy => "ZMQ_THREAD_SCHED_POLICY",
            Self::MaxMessageSize => "ZMQ_MAX_MSGSZ",
            Self::MessageSize => "ZMQ_MSG_T_SIZE",
            Self::ThreadAffinityCpuAdd => "ZMQ_THREAD_AFFINITY_CPU_ADD",
            Self::ThreadAffinityCpuRemove => "ZMQ_THREAD_AFFINITY_CPU_REMOVE",
            Self::ThreadNamePrefix => "ZMQ_THREAD_NAME_PREFIX",
            Self::Ipv6 => "ZMQ_IPV6",
            Self::Blocky => "ZMQ_BLOCKY",
        }
    }
}

/// Encode a boolean option the way the engine expects it.
#[inline]
pub(crate) const fn bool_to_raw(value: bool) -> i32 {
    if value {
        1
    } else {
        0
    }
}

/// Decode a boolean option. Only 1 is true.
#[inline]
pub(crate) const fn raw_to_bool(raw: i32) -> bool {
    raw == 1
}

/// Context configuration options.
///
/// Every field starts unset. Unset fields are never sent to the engine, so
/// the engine's own defaults stay in force for them.
///
/// # Examples
///
/// ```
/// use ferrule_core::options::ContextOptions;
///
/// let opts = ContextOptions::new()
///     .with_io_threads(4)
///     .with_max_sockets(256)
///     .with_ipv6(true);
///
/// assert_eq!(opts.io_threads, Some(4));
/// assert_eq!(opts.blocky, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// Size of the I/O thread pool (ZMQ_IO_THREADS)
    ///
    /// Must be set before the first socket is created to take effect.
    pub io_threads: Option<i32>,

    /// Socket table capacity (ZMQ_MAX_SOCKETS)
    pub max_sockets: Option<i32>,

    /// Dual-stack IPv6 on sockets created afterwards (ZMQ_IPV6)
    pub ipv6: Option<bool>,

    /// OS scheduling policy for I/O threads (ZMQ_THREAD_SCHED_POLICY)
    pub thread_sched_policy: Option<i32>,

    /// OS priority for I/O threads (ZMQ_THREAD_PRIORITY)
    pub thread_priority: Option<i32>,

    /// Whether terminate blocks on pending messages (ZMQ_BLOCKY)
    pub blocky: Option<bool>,

    /// Largest accepted message in bytes (ZMQ_MAX_MSGSZ)
    pub max_message_size: Option<i32>,

    /// Numeric prefix for I/O thread names (ZMQ_THREAD_NAME_PREFIX)
    pub thread_name_prefix: Option<i32>,

    /// CPUs added to the I/O thread affinity set (ZMQ_THREAD_AFFINITY_CPU_ADD)
    pub thread_affinity: Vec<i32>,
}

impl ContextOptions {
    /// Create options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the I/O thread count.
    pub fn with_io_threads(mut self, threads: i32) -> Self {
        self.io_threads = Some(threads);
        self
    }

    /// Set the maximum number of sockets.
    pub fn with_max_sockets(mut self, max: i32) -> Self {
        self.max_sockets = Some(max);
        self
    }

    /// Enable or disable IPv6.
    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = Some(enabled);
        self
    }

    /// Set the I/O thread scheduling policy.
    pub fn with_thread_sched_policy(mut self, policy: i32) -> Self {
        self.thread_sched_policy = Some(policy);
        self
    }

    /// Set the I/O thread priority.
    pub fn with_thread_priority(mut self, priority: i32) -> Self {
        self.thread_priority = Some(priority);
        self
    }

    /// Enable or disable blocking terminate.
    pub fn with_blocky(mut self, blocky: bool) -> Self {
        self.blocky = Some(blocky);
        self
    }

    /// Set the maximum message size.
    pub fn with_max_message_size(mut self, bytes: i32) -> Self {
        self.max_message_size = Some(bytes);
        self
    }

    /// Set the I/O thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: i32) -> Self {
        self.thread_name_prefix = Some(prefix);
        self
    }

    /// Pin I/O threads to one more CPU.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrule_core::options::ContextOptions;
    ///
    /// let opts = ContextOptions::new()
    ///     .with_thread_affinity_cpu(0)
    ///     .with_thread_affinity_cpu(2);
    ///
    /// assert_eq!(opts.thread_affinity, vec![0, 2]);
    /// ```
    pub fn with_thread_affinity_cpu(mut self, cpu: i32) -> Self {
        self.thread_affinity.push(cpu);
        self
    }

    /// The `(option, raw value)` pairs to send, in application order.
    ///
    /// The thread pool size goes first; the engine sizes the pool when the
    /// first socket is created and reads the other thread settings then.
    pub fn entries(&self) -> Vec<(ContextOption, i32)> {
        let mut entries = Vec::new();
        if let Some(threads) = self.io_threads {
            entries.push((ContextOption::IoThreads, threads));
        }
        if let Some(policy) = self.thread_sched_policy {
            entries.push((ContextOption::ThreadSchedPolicy, policy));
        }
        if let Some(priority) = self.thread_priority {
            entries.push((ContextOption::ThreadPriority, priority));
        }
        if let Some(prefix) = self.thread_name_prefix {
            entries.push((ContextOption::ThreadNamePrefix, prefix));
        }
        for &cpu in &self.thread_affinity {
            entries.push((ContextOption::ThreadAffinityCpuAdd, cpu));
        }
        if let Some(max) = self.max_sockets {
            entries.push((ContextOption::MaxSockets, max));
        }
        if let Some(bytes) = self.max_message_size {
            entries.push((ContextOption::MaxMessageSize, bytes));
        }
        if let Some(enabled) = self.ipv6 {
            entries.push((ContextOption::Ipv6, bool_to_raw(enabled)));
        }
        if let Some(blocky) = self.blocky {
            entries.push((ContextOption::Blocky, bool_to_raw(blocky)));
        }
        entries
    }
}
