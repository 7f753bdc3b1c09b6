//! # autoleave-domain
//!
//! Pure domain model for the autoleave UI automation.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define the **UI node** abstraction ([`node::UiNode`]) every host backend implements
//! - Define the **matchers** that search a node tree (text, keyword, clickability, geometry)
//! - Define **click escalation** (nearest clickable ancestor, inclusive)
//! - Define the **step** cycle and the mutable **automation state**
//! - Define the **target profile** (package, labels, markers, delays)
//! - Define **keyword sets** parsed from the persisted preference string
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod click;
pub mod keyword;
pub mod matcher;
pub mod node;
pub mod profile;
pub mod state;
pub mod step;
