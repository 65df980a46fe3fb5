pub mod errors;
pub mod plan;
pub mod unifier;

pub use errors::{UnifyError, UnifyResult};
pub use plan::{ColumnSlot, ResolutionPlan};
pub use unifier::{SchemaUnifier, Unification, unify};
