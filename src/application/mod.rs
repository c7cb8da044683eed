pub mod coordinator;
pub mod data_cache;
pub mod request_sequencer;
pub mod use_cases;

pub use coordinator::*;
pub use data_cache::*;
pub use request_sequencer::*;
pub use use_cases::*;
