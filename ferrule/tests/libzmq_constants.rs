//! Integer constants must match the linked libzmq verbatim

use ferrule::{ContextOption, SocketType};

#[test]
fn test_socket_types_match_zmq_crate() {
    assert_eq!(SocketType::Req.raw(), zmq::REQ as i32);
    assert_eq!(SocketType::Rep.raw(), zmq::REP as i32);
    assert_eq!(SocketType::Dealer.raw(), zmq::DEALER as i32);
    assert_eq!(SocketType::Router.raw(), zmq::ROUTER as i32);
}

#[test]
fn test_socket_types_match_zmq_sys() {
    assert_eq!(SocketType::Req.raw(), zmq_sys::ZMQ_REQ as i32);
    assert_eq!(SocketType::Rep.raw(), zmq_sys::ZMQ_REP as i32);
    assert_eq!(SocketType::Dealer.raw(), zmq_sys::ZMQ_DEALER as i32);
    assert_eq!(SocketType::Router.raw(), zmq_sys::ZMQ_ROUTER as i32);
}

#[test]
fn test_context_options_match_zmq_sys() {
    assert_eq!(ContextOption::IoThreads.id(), zmq_sys::ZMQ_IO_THREADS as i32);
    assert_eq!(ContextOption::MaxSockets.id(), zmq_sys::ZMQ_MAX_SOCKETS as i32);
    assert_eq!(ContextOption::SocketLimit.id(), zmq_sys::ZMQ_SOCKET_LIMIT as i32);
    assert_eq!(ContextOption::ThreadPriority.id(), zmq_sys::ZMQ_THREAD_PRIORITY as i32);
    assert_eq!(
        ContextOption::ThreadSchedPolicy.id(),
        zmq_sys::ZMQ_THREAD_SCHED_POLICY as i32
    );
    assert_eq!(ContextOption::Ipv6.id(), zmq_sys::ZMQ_IPV6 as i32);
}

#[test]
fn test_context_interoperates_with_zmq_crate_context() {
    // Same library underneath: both report the same version.
    let (major, minor, patch) = zmq::version();
    let ours = ferrule::version();
    assert_eq!((ours.major, ours.minor, ours.patch), (major, minor, patch));
}
