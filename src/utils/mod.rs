pub mod download;
pub mod integrity;
pub mod locker;
pub mod naming;
pub mod retention;
pub mod waiter;

// Re-export commonly used types (used by test crate)
#[allow(unused_imports)]
pub use download::{Downloader, LocalArtifact};
#[allow(unused_imports)]
pub use retention::RetentionManager;
#[allow(unused_imports)]
pub use waiter::ActionWaiter;
