//! # autoleave-app
//!
//! Application layer: the automation itself and its **port definitions**.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `TreeSource` / `Snapshot`: tick-scoped access to the host UI tree
//!   - `KeywordStore`: the configured group keywords
//! - Provide the **step machine** that advances one cycle step per tick
//! - Provide the **poll scheduler** that runs the machine on a timer, one
//!   tick at a time, with an injected interval policy and a stop hook
//!
//! ## Dependency rule
//! Depends on `autoleave-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod interval;
pub mod ports;
pub mod scheduler;
pub mod step_machine;
