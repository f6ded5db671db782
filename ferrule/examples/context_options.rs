//! Context Options Example
//!
//! Creates a libzmq context from a `ContextOptions`, prints what the engine
//! reports back, opens one socket of each type, then tears everything down.
//!
//! Run this example:
//! ```bash
//! RUST_LOG=debug cargo run --example context_options
//! ```

use ferrule::prelude::*;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    ferrule::dev_tracing::init_tracing();

    println!("=== Context Options Demo ===\n");
    println!("libzmq {}", ferrule::version());

    let opts = ContextOptions::new()
        .with_io_threads(2)
        .with_max_sockets(256)
        .with_ipv6(true);
    let ctx = Context::with_options(&opts)?;

    println!("\n## Engine view");
    println!("  io threads:    {}", ctx.io_threads()?);
    println!("  max sockets:   {}", ctx.max_sockets()?);
    println!("  socket limit:  {}", ctx.socket_limit()?);
    println!("  ipv6:          {}", ctx.is_ipv6_enabled()?);
    println!("  blocky:        {}", ctx.is_blocky()?);

    println!("\n## Sockets");
    let sockets = SocketType::ALL
        .iter()
        .map(|&kind| ctx.socket(kind))
        .collect::<Result<Vec<_>>>()?;
    for socket in &sockets {
        socket.set_linger(Some(Duration::ZERO))?;
        println!("  {} (raw type {})", socket.kind(), socket.kind().raw());
    }

    // Shutting down does not close the sockets above.
    ctx.shutdown()?;
    info!(live = ctx.is_live(), open = sockets.len(), "Context shut down");
    match ctx.socket(SocketType::Req) {
        Ok(_) => println!("\nunexpected: socket opened on a shut down context"),
        Err(e) => println!("\nsocket after shutdown: {e}"),
    }
    drop(sockets);

    // Dropping ctx releases the engine instance.
    Ok(())
}
