//! Session token handling
//!
//! Holds the bearer credential obtained at login and answers "is this session
//! still valid?" with as few backend round-trips as possible: a short grace
//! window right after login, then a time-boxed cached verdict.

mod cache;
mod clock;
mod credential;
mod manager;
mod store;

pub use cache::{CacheDecision, SessionCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{CachedVerdict, SessionCredential};
pub use manager::{AccessError, AuthError, SessionManager, SessionStatus};
pub use store::{CredentialSnapshot, CredentialStore, FileCredentialStore, MemoryCredentialStore};
