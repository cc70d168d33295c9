//! Query a fleet of Intel AMT endpoints by operation name.
//!
//! The crate sits between a consumer (web handler, CLI, test) and the wire
//! client:
//!
//! ```text
//! consumer ─▶ Dispatcher ─▶ Inventory (record lookup)
//!                 │
//!                 ├─▶ SessionRegistry (get-or-create session)
//!                 ├─▶ Catalog (resolve call name)
//!                 ├─▶ RemoteClient (execute)
//!                 └─▶ normalize (classify + pretty-print)
//! ```
//!
//! Two call namespaces share one [`Catalog`]: logical call names such as
//! `AMTGeneralSettings`, and `class` + `method` pairs such as
//! `AMT_GeneralSettings` / `Get`.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod normalize;

pub use amt_protocol::{ConnectionParameters, EndpointRecord, Fault, Method, Reply, ResourceClass, ResponseTrace};
pub use amt_runtime::{ClientFactory, RemoteClient, SessionRegistry};
pub use catalog::{Catalog, InvalidParameter, OperationDescriptor};
pub use config::ExplorerConfig;
pub use dispatch::Dispatcher;
pub use error::{CallError, CallResult, ErrorKind, Result};
pub use inventory::{Inventory, InventoryError, MemoryInventory};
