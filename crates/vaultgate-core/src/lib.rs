//! Core library for vaultgate.
//!
//! A password gate for a protected page. Submitted passwords are hashed with
//! SHA-256 and compared against a fixed credential; a successful login is
//! remembered in session storage for 30 minutes.
//!
//! This is client-side protection only. Anyone who can read the deliverable
//! can read the credential digest.
//!
//! - `gate`: the [`VaultGate`] state machine
//! - `credential`: hashing and the expected digest
//! - `session`: the stored session record and its expiry rules
//! - `storage`: the injected key-value store
//! - `page`: the [`HostPage`] markup contract
//! - `readiness`: the host's "all fragments loaded" signal
//! - `clock`: time source, swappable in tests

pub mod clock;
pub mod credential;
pub mod error;
pub mod gate;
pub mod page;
pub mod readiness;
pub mod session;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{compute_hash, Credential, HexDigest, DEFAULT_CREDENTIAL_HEX};
pub use error::{CredentialError, StorageError};
pub use gate::{GateStatus, RenderOutcome, SubmitOutcome, VaultGate};
pub use page::{FormPlacement, HostPage, LoginForm};
pub use readiness::{Readiness, ReadyWaiter};
pub use session::{session_timeout, SessionRecord, SESSION_TIMEOUT_MINUTES};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
