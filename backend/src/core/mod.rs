//! Core engine utilities

pub mod time;
