// lib.rs - 库函数

pub mod cli;
pub mod io;
pub mod sample;
pub mod subsample;

pub use sample::Selection;
pub use subsample::{run, InsufficientReads, ReversePaths, SubsampleConfig, SubsampleSummary};
