pub mod progress_store;

pub use progress_store::{ProgressRecord, ProgressStore};
