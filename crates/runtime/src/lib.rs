//! AMT Runtime - remote client capability and session registry
//!
//! This crate owns the lifecycle of authenticated wire-protocol clients:
//!
//! - **Capability traits**: [`RemoteClient`] (the read verbs a session exposes)
//!   and [`ClientFactory`] (how a session is built from connection parameters)
//! - **Session registry**: one cached client per endpoint identity, reused
//!   across requests and evicted after an idle TTL
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ amt-explorer │  Catalog + dispatcher
//! └──────┬───────┘
//!        │ acquire / destroy
//! ┌──────▼───────┐
//! │ amt-runtime  │  This crate
//! │  ┌────────┐  │
//! │  │Registry│  │  DashMap<identity, entry> + idle timers
//! │  └────────┘  │
//! └──────┬───────┘
//!        │ ClientFactory::create
//! ┌──────▼───────┐
//! │ wire client  │  WS-Man transport (external)
//! └──────────────┘
//! ```

pub mod client;
pub mod error;
pub mod registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{BoxFut, ClientFactory, RemoteClient};
pub use error::{Error, Result};
pub use registry::{ClientGuard, DEFAULT_IDLE_TTL, RegistryConfig, SessionHandle, SessionRegistry};
