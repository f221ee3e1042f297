//! Main crate for the `hetzner-dns-authenticator` application.
//!
//! Completes ACME DNS-01 challenges by creating and removing TXT records in Hetzner DNS.
//!
//! For more information, choose one of the modules below.
//! - [`authenticator`]s are what an ACME client calls to perform and clean up a challenge
//! - [`hetzner`] contains the client for the Hetzner DNS API and its error types
//! - [`domain`] has helpers for matching domain names against zones

#![allow(clippy::uninlined_format_args)]

pub mod authenticator;
pub mod config;
pub mod domain;
pub mod hetzner;
