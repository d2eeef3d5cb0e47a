pub mod azure;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod idempotency;
pub mod mutate;
pub mod naming;
pub mod options;
pub mod outputs;
pub mod subscription;
pub mod synth;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
