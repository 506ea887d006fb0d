//! Import session for the CSV import engine.
//!
//! [`ImportSession`] owns one import from upload to confirmation. It wires
//! the matcher, mapping state, template store and validator together and
//! hands the final records to a [`CommitSink`].
//!
//! # Example
//!
//! ```ignore
//! use import_core::{ImportSession, Step};
//!
//! let mut session = ImportSession::default();
//! session.load_upload(headers, rows)?;
//! if session.validate_data().passed() {
//!     session.commit(&mut sink).await?;
//! }
//! assert_eq!(session.step(), Step::Confirmation);
//! ```

#![deny(unsafe_code)]

mod commit;
mod config;
mod error;
pub mod pager;
mod session;

pub use commit::{CommitBatch, CommitError, CommitSink, CommitStatus, CommitTicket};
pub use config::{ConfigError, ImportConfig};
pub use error::{Result, SessionError};
pub use pager::{DEFAULT_PAGE_SIZE, Page};
pub use session::{ImportSession, PreviewRow, SortOrder, SortSpec, Step};
