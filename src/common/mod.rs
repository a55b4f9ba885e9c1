pub mod lock;
pub mod paths;

// Re-export commonly used types
pub use lock::{InstanceLock, LockError};
