//! The Message Router: synchronous-feeling, type-keyed dispatch for commands
//! and queries within a single process (spec.md §4.D).

mod config;
mod handler;
mod router;

pub use config::{RouterOptions, RouterOptionsBuilder};
pub use handler::HandlerFn;
pub use router::MessageRouter;
