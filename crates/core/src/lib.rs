//! `gridboard-core` -- pure domain types for the widget dashboard.
//!
//! Holds the widget data model, the static widget catalog, the
//! position/grid mapper, and the core error taxonomy. No I/O happens
//! in this crate; everything here is deterministic and synchronous.

pub mod catalog;
pub mod error;
pub mod grid;
pub mod layout;
pub mod roles;
pub mod types;
pub mod widget;
