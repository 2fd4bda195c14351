pub mod cas_client;
pub mod pitch_client;

pub use cas_client::CasClient;
pub use pitch_client::{JsonFetcher, PitchClient};
