pub mod annotate;
pub mod config;
pub mod parse;
pub mod run;
