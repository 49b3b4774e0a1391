pub use amount::{AmountParseError, CELEBRATION_THRESHOLD, WeiAmount};
pub use classifier::{BLOCK_TYPE_OK_PROPOSAL, BLOCK_TYPE_OK_PROPOSAL_BLS_KEYS, BLOCK_TYPE_WRONG_FEE_RECIPIENT, classify, record_id};
pub use event::{BlockProposal, ClassifiedEvent, Donation, EventId, EventKind, FeeViolation, SkipReason};
pub use record::{EventRecord, RecordSource};

mod amount;
mod classifier;
mod event;
mod record;
