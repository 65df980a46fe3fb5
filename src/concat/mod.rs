pub mod cancel;
pub mod coerce;
pub mod concatenator;
pub mod errors;
pub mod parallel;

pub use cancel::CancelHandle;
pub use coerce::coerce;
pub use concatenator::{ConcatState, ConcatStats, Concatenator};
pub use errors::{ConcatError, ConcatResult};
pub use parallel::buffer_sources;
