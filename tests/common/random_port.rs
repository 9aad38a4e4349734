use std::process;
use std::sync::atomic::{AtomicU16, Ordering};

const STARTING_PORT: u16 = 10000;
const PORT_STRIDE: u16 = 10;

static NEXT_PORT: AtomicU16 = AtomicU16::new(0);

/// Ports are spread by the process id so concurrently running test binaries
/// do not collide, and by an in-process counter so tests within one binary
/// get distinct servers.
pub fn get_next_port() -> u16 {
    let offset = NEXT_PORT.fetch_add(PORT_STRIDE, Ordering::SeqCst);
    let pid_shift = ((process::id() % 1951) * 17) as u16;
    STARTING_PORT + pid_shift + offset
}
