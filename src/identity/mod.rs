//! Session identity for the marketplace client: the role enum, the session value and
//! the shared handle that the API client and router both read.
//! Keep the public surface thin and split implementation across sub-modules.

mod role;
mod session;
mod storage;

pub use role::Role;
pub use session::{Session, SessionHandle, SessionToken};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StoredSession};
