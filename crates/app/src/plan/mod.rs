//! Query planning: strategy builders and the top-level planner.

mod facet;
mod fields;
pub(crate) mod highlight;
mod keyword;
mod planner;
mod semantic;
mod syntax;
mod vector;

pub use fields::FieldListOutcome;
pub use planner::{PlannedQuery, plan_query};

/// One composed query fragment plus its parameter-slot bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    /// Fragment text joined into the main `q` parameter.
    pub query: String,
    /// Named parameter slots referenced by the fragment via `$name`.
    pub bindings: Vec<(Box<str>, Box<str>)>,
}
