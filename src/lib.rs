#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod core;
pub mod map;
pub mod prelude;
pub mod quantity;
pub mod report;
pub mod tables;
