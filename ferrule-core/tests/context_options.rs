//! Option protocol tests for `Context` over the in-memory engine

use ferrule_core::engine::MemoryEngine;
use ferrule_core::errno;
use ferrule_core::options::{self, ContextOptions};
use ferrule_core::prelude::*;

fn context() -> Context<MemoryEngine> {
    Context::with_engine(MemoryEngine::new()).expect("context")
}

#[test]
fn test_io_threads_round_trip() {
    let ctx = context();
    for threads in [1, 4, 64] {
        ctx.set_io_threads(threads).unwrap();
        assert_eq!(ctx.io_threads().unwrap(), threads);
    }
    ctx.set_io_threads(options::DEFAULT_IO_THREADS).unwrap();
    assert_eq!(ctx.io_threads().unwrap(), 1);
}

#[test]
fn test_max_sockets_round_trip() {
    let ctx = context();
    ctx.set_max_sockets(256).unwrap();
    assert_eq!(ctx.max_sockets().unwrap(), 256);
    ctx.set_max_sockets(options::DEFAULT_MAX_SOCKETS).unwrap();
    assert_eq!(ctx.max_sockets().unwrap(), 1024);
}

#[test]
fn test_ipv6_default_and_round_trip() {
    let ctx = context();
    assert_eq!(ctx.is_ipv6_enabled().unwrap(), options::DEFAULT_IPV6);

    ctx.set_ipv6_enabled(true).unwrap();
    assert!(ctx.is_ipv6_enabled().unwrap());
    ctx.set_ipv6_enabled(false).unwrap();
    assert!(!ctx.is_ipv6_enabled().unwrap());
}

#[test]
fn test_blocky_round_trip() {
    let ctx = context();
    assert_eq!(ctx.is_blocky().unwrap(), options::DEFAULT_BLOCKY);
    ctx.set_blocky(false).unwrap();
    assert!(!ctx.is_blocky().unwrap());
}

#[test]
fn test_inherit_sentinel_is_rejected_by_engine() {
    // -1 is what the engine reports as "inherit"; it cannot be written back.
    let ctx = context();
    let err = ctx
        .set_thread_priority(options::DEFAULT_THREAD_PRIORITY)
        .unwrap_err();
    assert_eq!(err.code(), errno::EINVAL);
    let err = ctx
        .set_thread_sched_policy(options::DEFAULT_THREAD_SCHED_POLICY)
        .unwrap_err();
    assert_eq!(err.code(), errno::EINVAL);
}

#[test]
fn test_socket_limit_is_independent_of_thread_priority() {
    // Both live under key 3; writing the priority must not move the limit.
    let ctx = context();
    let limit = ctx.socket_limit().unwrap();
    ctx.set_thread_priority(20).unwrap();
    assert_eq!(ctx.socket_limit().unwrap(), limit);
}

#[test]
fn test_options_builder_applies_in_one_call() {
    let opts = ContextOptions::new()
        .with_io_threads(4)
        .with_max_sockets(256)
        .with_ipv6(true)
        .with_thread_priority(5)
        .with_thread_affinity_cpu(0)
        .with_max_message_size(1 << 20);

    let ctx = Context::with_engine_and_options(MemoryEngine::new(), &opts).unwrap();
    assert_eq!(ctx.io_threads().unwrap(), 4);
    assert_eq!(ctx.max_sockets().unwrap(), 256);
    assert!(ctx.is_ipv6_enabled().unwrap());
    assert_eq!(ctx.max_message_size().unwrap(), 1 << 20);
}

#[test]
fn test_apply_on_live_context() {
    let ctx = context();
    ctx.apply(&ContextOptions::new().with_blocky(false)).unwrap();
    assert!(!ctx.is_blocky().unwrap());

    // Unset fields are left alone.
    ctx.apply(&ContextOptions::default()).unwrap();
    assert!(!ctx.is_blocky().unwrap());
}

#[test]
fn test_max_sockets_caps_socket_creation() {
    let ctx = context();
    ctx.set_max_sockets(2).unwrap();

    let _a = ctx.socket(SocketType::Dealer).unwrap();
    let _b = ctx.socket(SocketType::Router).unwrap();
    let err = ctx.socket(SocketType::Req).unwrap_err();
    assert_eq!(err.code(), errno::EMFILE);
}
