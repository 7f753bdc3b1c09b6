//! # autoleave-adapter-virtual
//!
//! Virtual host that stands in for a live accessibility service.
//!
//! A script is an ordered list of screens. Each screen is a UI tree built
//! from [`NodeSpec`]s. Clicking a node that declares `navigates_to` switches
//! the foreground to that screen for the *next* snapshot, which mimics a
//! host that rebuilds its tree asynchronously between ticks.
//!
//! ## Provided pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`NodeSpec`] / [`ScreenSpec`] | Declarative, JSON-loadable tree description |
//! | [`VirtualTree`] | Immutable arena built from a screen |
//! | [`ScriptedHost`] | [`TreeSource`](autoleave_app::ports::TreeSource) over a script, records clicks |
//! | [`demo_script`] | Built-in six-screen leave-group walkthrough |
//!
//! ## Dependency rule
//!
//! Depends on `autoleave-app` (port traits) and `autoleave-domain` only.

mod error;
mod host;
mod script;
mod tree;

pub use error::ScriptError;
pub use host::{ClickRecord, ScriptedHost, VirtualNode, VirtualSnapshot};
pub use script::{DEMO_GROUP, demo_script, screen};
pub use tree::{NodeSpec, ScreenSpec, VirtualTree};
