//! # Tempora Core
//!
//! The calendar temporal engine - pure business logic, no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Grid generation (pure day/week/month structure)
//! - The month-partitioned item cache with bounded eviction
//! - Fetch coordination with single-flight request deduplication
//! - Mutation routing that keeps the cache coherent
//! - The viewport controller driving virtualized infinite scroll
//! - Port/adapter interfaces (traits) for the backing store
//!
//! ## Architecture Principles
//! - Only depends on `tempora-common` and `tempora-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod cache;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod grid;
pub mod mutation;
pub mod viewport;

// Infrastructure ports
pub mod ports;

// Re-export specific items to avoid ambiguity
pub use cache::MonthCache;
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::CalendarEngine;
pub use fetch::FetchCoordinator;
pub use grid::{generate_month, this_week, WEEKDAY_LABELS};
pub use mutation::MutationRouter;
pub use ports::{ItemStore, MembershipDirectory};
pub use viewport::{
    EdgeDirection, ScrollMetrics, ScrollTarget, SectionBounds, ViewportController, ViewportPhase,
};
