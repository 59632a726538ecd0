//! `talenthq-store` — read-only access to the external HR record store.
//!
//! The analytics engine never queries storage itself; this crate fetches raw
//! records per source so the orchestration layer can degrade individual
//! sections when one source fails. Writes do not exist here: the engine is
//! an observer of the operational system, never a participant.

pub mod error;
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod traits;

pub use error::StoreError;
pub use memory::InMemoryHrStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresHrStore;
pub use traits::HrStore;
