pub mod cli;
pub mod clients;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod models;
pub mod parse;
pub mod resolve;
pub mod service;
pub mod shell;
