//! Command-line front-end for the CyberKit lab.
//!
//! The `cyberkit` binary is a thin wrapper over this library:
//! - `config`: argument and environment parsing
//! - `commands`: one handler per subcommand, writing to any `io::Write`
//! - `error`: command failures
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use cyberkit_cli::Cli;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let cli = Cli::parse_from(["cyberkit", "hash", "--algorithm", "md5", "password"]);
//! let mut out = Vec::new();
//! cyberkit_cli::run(cli, &mut out).await.unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "5f4dcc3b5aa765d61d8327deb882cf99\n");
//! # });
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;

pub use commands::run;
pub use config::{CipherArgs, CipherChoice, Cli, Command, CrackArgs};
pub use error::CliError;
