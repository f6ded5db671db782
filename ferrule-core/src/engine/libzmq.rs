//! libzmq over FFI.
//!
//! The only module in the workspace that calls into C.

#![allow(unsafe_code)]

use std::ffi::{c_int, c_void, CStr};
use std::mem;

use super::{Engine, RawContext, RawSocket, Version};
use crate::error::EngineError;

/// Forwards every call to the linked libzmq.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibZmq;

impl LibZmq {
    /// Capture `zmq_errno` and its message. Call right after the failure.
    fn last_error() -> EngineError {
        let code = unsafe { zmq_sys::zmq_errno() };
        EngineError::new(code, strerror(code))
    }

    fn check(rc: c_int) -> Result<(), EngineError> {
        if rc == -1 {
            Err(Self::last_error())
        } else {
            Ok(())
        }
    }
}

fn strerror(code: c_int) -> String {
    // zmq_strerror returns a static string for every code, known or not.
    let msg = unsafe { zmq_sys::zmq_strerror(code) };
    if msg.is_null() {
        return format!("unknown error {code}");
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}

impl Engine for LibZmq {
    fn new_context(&self) -> Result<RawContext, EngineError> {
        let ptr = unsafe { zmq_sys::zmq_ctx_new() };
        RawContext::from_ptr(ptr).ok_or_else(Self::last_error)
    }

    fn shutdown_context(&self, ctx: RawContext) -> Result<(), EngineError> {
        Self::check(unsafe { zmq_sys::zmq_ctx_shutdown(ctx.as_ptr()) })
    }

    fn terminate_context(&self, ctx: RawContext) -> Result<(), EngineError> {
        Self::check(unsafe { zmq_sys::zmq_ctx_term(ctx.as_ptr()) })
    }

    fn context_get(&self, ctx: RawContext, option: i32) -> Result<i32, EngineError> {
        let rc = unsafe { zmq_sys::zmq_ctx_get(ctx.as_ptr(), option) };
        if rc == -1 {
            return Err(Self::last_error());
        }
        Ok(rc)
    }

    fn context_set(&self, ctx: RawContext, option: i32, value: i32) -> Result<(), EngineError> {
        Self::check(unsafe { zmq_sys::zmq_ctx_set(ctx.as_ptr(), option, value) })
    }

    fn open_socket(&self, ctx: RawContext, kind: i32) -> Result<RawSocket, EngineError> {
        let ptr = unsafe { zmq_sys::zmq_socket(ctx.as_ptr(), kind) };
        RawSocket::from_ptr(ptr).ok_or_else(Self::last_error)
    }

    fn close_socket(&self, socket: RawSocket) -> Result<(), EngineError> {
        Self::check(unsafe { zmq_sys::zmq_close(socket.as_ptr()) })
    }

    fn socket_get(&self, socket: RawSocket, option: i32) -> Result<i32, EngineError> {
        let mut value: c_int = 0;
        let mut len = mem::size_of::<c_int>();
        Self::check(unsafe {
            zmq_sys::zmq_getsockopt(
                socket.as_ptr(),
                option,
                (&mut value as *mut c_int).cast::<c_void>(),
                &mut len,
            )
        })?;
        Ok(value)
    }

    fn socket_set(&self, socket: RawSocket, option: i32, value: i32) -> Result<(), EngineError> {
        let value: c_int = value;
        Self::check(unsafe {
            zmq_sys::zmq_setsockopt(
                socket.as_ptr(),
                option,
                (&value as *const c_int).cast::<c_void>(),
                mem::size_of::<c_int>(),
            )
        })
    }

    fn version(&self) -> Version {
        let (mut major, mut minor, mut patch): (c_int, c_int, c_int) = (0, 0, 0);
        unsafe { zmq_sys::zmq_version(&mut major, &mut minor, &mut patch) };
        Version {
            major,
            minor,
            patch,
        }
    }
}
