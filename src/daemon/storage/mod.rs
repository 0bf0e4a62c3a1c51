//!  Storage is organized through [domain_store::JsonFileStore].
//!  The basic idea is:
//!   - There is a single json object file in the application directory.
//!   - Every key is a domain, every value is the number of seconds spent on it.
//!   - Writers rewrite the whole object under an exclusive file lock, so the host process and the
//!     cli can both touch it.

pub mod domain_store;
pub mod entities;
