pub mod clock;
pub mod json_store;
pub mod memory_store;
pub mod records;

pub use clock::{FixedClock, SystemClock};
pub use json_store::JsonFileStore;
pub use memory_store::InMemoryStore;
