#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod pages;
pub mod reader;
pub mod reveal;
pub mod session;
pub mod web;
