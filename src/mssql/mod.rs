//! Blocking SQL Server client over tiberius.
//!
//! tiberius is async; every connection owns a current-thread tokio runtime and blocks on it
//! for each call, so this client must not be used from inside another runtime's async
//! context.

mod client;
mod config;
mod query;

pub use client::{TiberiusClient, TiberiusConnection};
