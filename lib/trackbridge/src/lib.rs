pub mod counter;
pub mod deezer;
pub mod error;
pub mod extract;
pub mod matching;
pub mod reconcile;
pub mod retry;
pub mod services;
pub mod spotify;
pub mod traits;

pub use counter::{MemoryCounterStore, SearchCounter};
pub use error::{BridgeError, CounterError, PlatformError};
pub use extract::{extract, ExtractedIdentifier};
pub use reconcile::{Bridge, CreateRequest};
pub use services::{Platforms, PlatformsBuilder};
pub use traits::{CounterStore, MusicPlatform, PlatformUser, UserDirectory};
