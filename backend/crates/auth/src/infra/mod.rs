//! Infrastructure Layer
//!
//! Database implementations and in-memory test doubles.

pub mod memory;
pub mod postgres;

pub use memory::MemAuthRepository;
pub use postgres::PgAuthRepository;
