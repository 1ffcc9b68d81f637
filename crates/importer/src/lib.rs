pub mod check;
pub mod error;
pub mod import;
pub mod init;

pub use check::{CheckReport, check_store};
pub use error::{ImporterError, Result};
pub use import::{ImportReport, RejectedRecord, import_records, read_document};
pub use init::init_store;
