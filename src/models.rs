//! The message model shared by the store, the remote boundary and the cache.
//!
//! The same struct serves three formats that mostly overlap:
//! - the serialized form written to the durable store
//! - the records returned by the remote history endpoint
//! - the in-memory entries the presentation layer observes, which may
//!   additionally carry the pending flag for an unresolved placeholder
//!
//! The pending flag is in-memory only and never serializes.
pub mod message;
