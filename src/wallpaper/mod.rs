pub mod cli;
pub mod commands;
pub mod config;
pub mod feh;
pub mod interval;
pub mod random;
pub mod rotation;
