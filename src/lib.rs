// Library surface for the binary and the headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod projection;
pub mod round;
pub mod runtime;
pub mod score;
pub mod session;
pub mod source;
pub mod tiles;
pub mod timer;
pub mod ui;
