//! Grid snake with regular food and a timed bonus item.
//!
//! The simulation core (`snake`, `food`, `clock`, `game`) is pure data and
//! never touches the terminal; `renderer`, `ui`, `audio`, `input` and
//! `terminal_runtime` adapt it to a ratatui/crossterm front-end.

pub mod audio;
pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
