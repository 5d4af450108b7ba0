//! slcli: Command-line Client for the SoftLayer API
//!
//! A generic command framework over a remote procedure API: a static command
//! registry and dispatcher, a polymorphic output formatter, an identifier
//! resolver, a confirmation guard and one error taxonomy, plus the resource
//! commands built on them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod managers;
pub mod tooling;
pub mod transport;
