//! TestRail entity and payload types.
//!
//! Every entity here is a transient projection of a server-side record:
//! fetched fresh on each request, serialized into the response envelope,
//! and discarded. Nothing is cached or mutated locally.
//!
//! Payload (`New*` / `*Update`) types carry only caller-supplied fields;
//! optional fields are skipped entirely when absent because TestRail
//! treats a missing key differently from an empty value.

mod case;
mod project;
mod run;
mod user;

pub use case::*;
pub use project::*;
pub use run::*;
pub use user::*;
