//! zmesh wire protocol
//!
//! This crate provides types and utilities for building the compact binary
//! frames the zmesh stack hands to its transport, and for decoding the
//! application payloads the transport delivers back.
//!
//! # Frame Format
//!
//! Every outbound command frame addressed to a node has the same shape:
//!
//! | Field            | Size (bytes) | Description                                        |
//! |------------------|--------------|----------------------------------------------------|
//! | node_id          | 1            | Destination node address.                          |
//! | payload_length   | 1            | Bytes from `command_class` through the last param. |
//! | command_class    | 1            | Capability identifier (see [`constants`]).         |
//! | sub_command      | 1            | Command code within the class.                     |
//! | params           | 0..N         | Sub-command specific parameters.                   |
//! | transmit_options | 1            | Delivery flags, fixed to ACK | AUTO_ROUTE here.    |
//!
//! Inbound application payloads are already stripped of addressing by the
//! transport and start at the sub-command byte: `[sub_command, data...]`.

mod constants;
mod error;
mod frame;

pub use constants::*;
pub use error::*;
pub use frame::*;
