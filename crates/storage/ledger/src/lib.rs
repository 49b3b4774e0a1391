pub use error::LedgerError;
pub use ledger::{DedupLedger, LedgerEntry};
pub use store::{JsonFileStore, LedgerSnapshot, LedgerStore, MemoryStore};

mod error;
mod ledger;
mod store;
