//! Collaborator utilities built on the engine's public surface:
//! a request-history queue, batch query fan-out, and duplicate removal.

pub mod process_queries;
pub mod remove_duplicates;
pub mod request_queue;

pub use process_queries::{process_queries, process_queries_joined};
pub use remove_duplicates::remove_duplicates;
pub use request_queue::RequestQueue;
