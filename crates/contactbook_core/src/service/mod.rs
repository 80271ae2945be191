//! Core use-case services.
//!
//! # Responsibility
//! - Pair the repository with its store for callers such as the CLI.
//! - Keep UI layers decoupled from storage details.

pub mod contact_book;
