pub mod preference_store;
pub mod ranking;
pub mod recommendations;

pub use preference_store::{PreferenceSource, PreferenceStore, RecordOutcome};
