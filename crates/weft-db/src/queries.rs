//! Database query functions organized by entity.

pub mod blocks;
pub mod chunks;
pub mod tags;
pub mod transactions;
