//! # docseed-core
//!
//! Encode native values into the **Firestore REST** typed wire format and seed
//! a document store with demo data.
//!
//! Firestore's write API does not accept plain JSON values. Every field must be
//! wrapped in a single-key object naming its type (`integerValue`,
//! `timestampValue`, `mapValue`, ...). The [`encoder`] does that wrapping for an
//! untyped [`Value`] tree; the rest of the crate moves the result over HTTPS.
//!
//! ## Quick start
//!
//! ```rust
//! use docseed_core::{decode, encode, Fields, Value};
//! use serde_json::json;
//!
//! let fields: Fields = Value::from(json!({"active": true, "count": 3}))
//!     .into_fields()
//!     .unwrap();
//!
//! let encoded = encode(&fields);
//! assert_eq!(
//!     serde_json::to_value(&encoded).unwrap(),
//!     json!({"active": {"booleanValue": true}, "count": {"integerValue": "3"}})
//! );
//!
//! // wire → native (roundtrip)
//! assert_eq!(decode(&encoded).unwrap(), fields);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — untyped `Value` tree and conversions into it
//! - [`encoder`] — `Value` → wire value (never fails)
//! - [`decoder`] — wire value → `Value`
//! - [`timestamp`] — timestamp shape predicate and `…Z` rendering
//! - [`wire`] — serde types for values, write requests, and documents
//! - [`config`] — `StoreConfig`: project, database, key, endpoint
//! - [`store`] — `DocumentStore` trait and blocking `RestStore`
//! - [`seed`] — demo plan, plan files, sequential runner
//! - [`error`] — error type for everything but encoding

#![recursion_limit = "256"]

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod seed;
pub mod store;
pub mod timestamp;
pub mod value;
pub mod wire;

pub use config::StoreConfig;
pub use decoder::{decode, decode_value};
pub use encoder::{encode, encode_value};
pub use error::DocseedError;
pub use seed::{demo_plan, load_plan, run, SeedReport, SeedWrite};
pub use store::{write_target, DocumentStore, RestStore};
pub use timestamp::{looks_like_timestamp, now_timestamp};
pub use value::{Fields, Value};
pub use wire::{Document, EncodedFields, EncodedValue, WriteRequest};
