//! Shared test fixtures for Timeforge crates.
//!
//! This crate provides small problem instances for testing.
//! It only depends on `timeforge-core` so every other crate can use it as a
//! dev-dependency without cycles.
//!
//! - [`week`] - slot grid helpers
//! - [`scenarios`] - minimal instances exercising one behavior each
//! - [`school`] - a small feasible school for end-to-end solver runs
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! timeforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use timeforge_test::school::small_school;
//! use timeforge_test::scenarios::no_double_slots;
//! ```

pub mod scenarios;
pub mod school;
pub mod week;

pub use school::small_school;
pub use week::{slot_name, week};
