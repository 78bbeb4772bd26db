//! # reelcheck-sources
//!
//! Every fallible I/O path the audit touches lives behind one of three
//! abstractions here, and each is a total function: callers always get a
//! structured result, never an error or a panic.
//!
//! - [`remote`]: authenticated tabular reads/writes against the data service.
//! - [`web`]: plain HTTP GET probes against public endpoints.
//! - [`scanner`]: file lookup and regex search over a local source tree.

pub mod remote;
pub mod scanner;
pub mod web;

pub use remote::{
    CredentialTier, DataSource, Method, QueryRequest, QueryResult, RemoteClient,
    Unconfigured,
};
pub use scanner::{GrepMatch, SourceTree};
pub use web::{HttpProbe, ProbeResponse, WebProbe};
