//! UPDATE fragment synthesis
//!
//! Turns a partial record and a where-condition into the SET and WHERE pieces
//! of a parameterized statement:
//!
//! ```text
//! UPDATE <table> SET{set_fields}{where_fields}
//! ```
//!
//! Placeholders are positional (`$1`, `$2`, ...): where values first, then
//! record values, each in key iteration order. Binding the values and running
//! the statement is left to the caller.

mod errors;
mod fragments;

pub use errors::{Clause, UpdateError, UpdateResult};
pub use fragments::{FragmentMode, UpdateBuilder, UpdateFragments, WhereClause};
