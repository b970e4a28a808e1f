//! Database layer - connection pool, query catalogue and gateway
//!
//! # Design Principles
//!
//! - One pool per process, injected into handlers through the gateway
//! - Every route runs exactly one named statement from the catalogue
//! - Parameters are always bound, never interpolated
//! - Read-only: no transactions

pub mod gateway;
pub mod pool;
pub mod queries;
pub mod row;

pub use gateway::{DbError, PgGateway, QueryGateway};
pub use pool::{close_pool, create_pool, spawn_liveness_check};
pub use queries::{query, QueryDef, QueryName};
pub use row::Row;
