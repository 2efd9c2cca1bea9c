#![warn(missing_docs)]
//! # elevatorsolver
//!
//! Turn-based dispatch controller for a bank of elevators. An external turn authority owns
//! the simulated building; this library decides every tick which elevator moves where, and
//! brute-forces the authorization a loaded elevator needs before it may move.
//!
//! ## Overview
//! - **config**: Limits and print toggles.
//! - **init**: Command line and scenario file.
//! - **print**: Coloured terminal logging and the fleet status table.
//! - **error**: Errors that end a dispatch run.
//! - **world_view**: Requests, directives and the state envelope shared with the authority.
//! - **manager**: Request queues and nearest-request selection.
//! - **elevator_logic**: The fleet, direction decisions, authorization and the dispatch loop.
//! - **network**: Framed TCP channels to the turn authority and the solvers.

pub mod config;

pub mod init;

pub mod print;

pub mod error;

pub mod world_view;

pub mod manager;

pub mod elevator_logic;

pub mod network;
