//! Lifecycle tests for `Context` over the in-memory engine

use ferrule_core::engine::{Call, MemoryEngine};
use ferrule_core::errno;
use ferrule_core::prelude::*;

fn live_context() -> (MemoryEngine, Context<MemoryEngine>) {
    let engine = MemoryEngine::new();
    let ctx = Context::with_engine(engine.clone()).expect("context");
    (engine, ctx)
}

#[test]
fn test_construction_is_all_or_nothing() {
    let engine = MemoryEngine::new();
    engine.fail_next(Call::NewContext, errno::ENOMEM);

    let err = Context::with_engine(engine.clone()).unwrap_err();
    assert!(matches!(err, FerruleError::ContextCreationFailed(_)));
    assert_eq!(err.code(), errno::ENOMEM);
    assert_eq!(engine.live_contexts(), 0);

    // The next attempt gets a fully working context.
    let ctx = Context::with_engine(engine.clone()).unwrap();
    assert!(ctx.is_live());
    assert_eq!(ctx.io_threads().unwrap(), 1);
    assert_eq!(ctx.max_sockets().unwrap(), 1023);
    assert!(!ctx.is_ipv6_enabled().unwrap());
}

#[test]
fn test_shutdown_twice() {
    let (_engine, ctx) = live_context();
    ctx.shutdown().unwrap();
    ctx.shutdown().unwrap();
    assert!(ctx.raw().is_none());
}

#[test]
fn test_shutdown_leaves_open_sockets_closable() {
    let (engine, ctx) = live_context();
    let req = ctx.socket(SocketType::Req).unwrap();
    let rep = ctx.socket(SocketType::Rep).unwrap();

    ctx.shutdown().unwrap();
    assert!(ctx.socket(SocketType::Dealer).is_err());
    assert_eq!(engine.open_sockets(), 2);

    req.close().unwrap();
    drop(rep);
    assert_eq!(engine.open_sockets(), 0);
    assert_eq!(engine.calls(Call::CloseSocket), 2);

    drop(ctx);
    assert_eq!(engine.live_contexts(), 0);
}

#[test]
fn test_terminate_twice() {
    let (_engine, mut ctx) = live_context();
    ctx.terminate().unwrap();
    ctx.terminate().unwrap();
    assert!(ctx.raw().is_none());
}

#[test]
fn test_shutdown_then_terminate_releases_once() {
    let (engine, mut ctx) = live_context();
    let raw = ctx.raw().unwrap();

    ctx.shutdown().unwrap();
    assert!(engine.is_shut_down(raw));
    ctx.terminate().unwrap();
    assert_eq!(engine.live_contexts(), 1);

    drop(ctx);
    assert_eq!(engine.live_contexts(), 0);
    assert_eq!(engine.calls(Call::TerminateContext), 1);
}

#[test]
fn test_interrupted_terminate_can_be_retried() {
    let (engine, mut ctx) = live_context();
    engine.fail_next(Call::TerminateContext, errno::EINTR);

    assert!(ctx.terminate().unwrap_err().is_interrupted());
    assert!(ctx.is_live());
    ctx.terminate().unwrap();
    assert!(!ctx.is_live());
    assert_eq!(engine.live_contexts(), 0);
}

#[test]
fn test_scope_exit_terminates_on_every_path() {
    fn early_return(engine: &MemoryEngine) -> Result<()> {
        let ctx = Context::with_engine(engine.clone())?;
        ctx.set_io_threads(-5)?;
        unreachable!("option should have been rejected");
    }

    let engine = MemoryEngine::new();
    assert!(early_return(&engine).is_err());
    assert_eq!(engine.live_contexts(), 0);
    assert_eq!(engine.calls(Call::TerminateContext), 1);
}

#[test]
fn test_dead_context_rejects_everything() {
    let (engine, mut ctx) = live_context();
    ctx.terminate().unwrap();
    let before = engine.calls(Call::ContextGet) + engine.calls(Call::ContextSet);

    assert!(matches!(
        ctx.io_threads(),
        Err(FerruleError::ContextOperationFailed(_))
    ));
    assert!(matches!(
        ctx.set_max_sockets(256),
        Err(FerruleError::ContextOperationFailed(_))
    ));
    assert!(matches!(
        ctx.socket(SocketType::Router),
        Err(FerruleError::SocketCreationFailed(_))
    ));
    assert_eq!(
        engine.calls(Call::ContextGet) + engine.calls(Call::ContextSet),
        before
    );
}

#[test]
fn test_sockets_close_before_context() {
    let (engine, mut ctx) = live_context();
    {
        let req = ctx.socket(SocketType::Req).unwrap();
        let rep = ctx.socket(SocketType::Rep).unwrap();
        req.set_linger(Some(std::time::Duration::ZERO)).unwrap();
        assert_eq!(rep.kind(), SocketType::Rep);
        assert_eq!(engine.open_sockets(), 2);
    }
    ctx.terminate().unwrap();
    assert_eq!(engine.open_sockets(), 0);
    assert_eq!(engine.live_contexts(), 0);
}
