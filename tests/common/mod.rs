#![allow(dead_code)]

use rand::Rng;

mod binary_client;
mod params_builder;
mod random_port;
mod test_server;

pub use binary_client::{BinaryClient, CMD_DELETE, CMD_GET, CMD_NOOP, CMD_SET};
pub use params_builder::MemlrudServerParamsBuilder;
pub use test_server::spawn_server;

pub fn create_value_with_size(size: usize) -> String {
    let mut rng = rand::rng();
    let mut value = String::with_capacity(size);
    for _ in 0..size {
        let random_char = rng.random_range(b'a'..=b'z') as char;
        value.push(random_char);
    }
    value
}
