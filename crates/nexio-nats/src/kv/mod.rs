//! NATS Key-Value store operations.
//!
//! This module provides type-safe abstractions over NATS KV:
//! - `KvStore<K, V, B>`: Generic type-safe key-value operations
//! - `KvKey`: Trait for key types
//! - `KvBucket`: Trait for bucket configuration
//!
//! Each flow phase gets its own bucket (auth states, credentials,
//! item lists) with a per-bucket TTL; within a bucket, entries are
//! addressed by a [`FlowKey`] rendered as `{platform}.{org}.{user}`.

mod kv_bucket;
mod kv_key;
mod kv_store;

pub use kv_bucket::{AuthStatesBucket, CredentialsBucket, ItemsBucket, KvBucket};
pub use kv_key::{FlowKey, KvKey};
pub use kv_store::{KvEntry, KvStore, KvValue};
