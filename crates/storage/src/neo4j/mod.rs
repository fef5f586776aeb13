//! Neo4j implementation of the graph read contract

pub(crate) mod client;

pub use client::Neo4jGraphStore;
