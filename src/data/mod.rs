//! Persisted marked-map records and the store boundary they travel through.

pub mod http;
pub mod records;
pub mod store;
