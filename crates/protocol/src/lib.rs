//! Boundary types for Intel AMT WS-Management queries.
//!
//! This crate contains the plain data exchanged between the explorer core and
//! the wire-protocol client that actually talks to an endpoint. Nothing here
//! performs I/O:
//!
//! - [`ConnectionParameters`] / [`EndpointRecord`]: how to reach an endpoint
//! - [`ResourceClass`] / [`Method`]: the closed set of queryable WS-Man classes and read verbs
//! - [`Reply`] / [`ResponseTrace`] / [`Fault`]: what a remote call hands back

pub mod class;
pub mod connection;
pub mod reply;

pub use class::{Method, ResourceClass, Schema, UnknownMethod};
pub use connection::{ConnectionParameters, EndpointRecord};
pub use reply::{Fault, Reply, ResponseTrace};
