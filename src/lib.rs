// Library surface for headless/integration tests and reuse.
// Terminal rendering and the App wiring live in the binary.
pub mod app_dirs;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod runtime;
pub mod session;
pub mod target;
pub mod timer;
