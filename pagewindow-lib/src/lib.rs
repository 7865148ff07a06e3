//! Windowed collection viewer core
//!
//! Incrementally loads a remote, page-structured dataset into an in-memory
//! window, either as a growing list ([`controller::AppendController`]) or as a
//! discretely paged table ([`controller::ReplaceController`]) with per-column
//! sort toggling ([`sort::SortToggler`]).

pub mod api;
pub mod category;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod sentinel;
pub mod sort;

mod client;

pub use client::*;
