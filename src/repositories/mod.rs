//! Repositorios
//!
//! `FleetStore` es la frontera de persistencia; hay una implementación
//! PostgreSQL y una en memoria.

pub mod fleet_store;
pub mod memory_fleet_store;
pub mod pg_fleet_store;

pub use fleet_store::FleetStore;
pub use memory_fleet_store::MemoryFleetStore;
pub use pg_fleet_store::PgFleetStore;
