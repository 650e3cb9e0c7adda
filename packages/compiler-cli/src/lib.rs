#![deny(clippy::all)]

/**
 * Trellis CLI
 *
 * Project loading, parallel template compilation and host-page rendering
 * behind the `trellis` binary.
 */
// Re-export the packages the CLI drives
pub use trellis_compiler as compiler;
pub use trellis_runtime as runtime;

pub mod config;
pub mod perform_compile;
pub mod perform_render;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
