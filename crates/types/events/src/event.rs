use crate::amount::WeiAmount;
use std::fmt::{Display, Formatter};
use strum_macros::Display as StrumDisplay;

/// Feed-scoped event identifier (block number)
pub type EventId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    BlockProposed,
    FeeViolation,
    DonationReceived,
}

/// A validator proposed a block into the smoothing pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockProposal {
    pub id: EventId,
    pub slot: u64,
    pub validator_index: u64,
    pub reward: WeiAmount,
}

/// A validator sent the block reward somewhere other than the pool and got banned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeViolation {
    pub id: EventId,
    pub slot: u64,
    pub withdrawal_address: String,
    pub amount: WeiAmount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Donation {
    pub id: EventId,
    pub donor: String,
    pub amount: WeiAmount,
    pub tx_hash: String,
}

/// Why a record cannot be turned into a message. Not an error: the oracle
/// routinely reports blocks without a reward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingField(&'static str),
    MalformedField(&'static str),
    UnsupportedBlockType(String),
}

impl SkipReason {
    /// Missing fields and other block types are routine. A malformed field
    /// points at a change in the feed format.
    pub fn is_expected(&self) -> bool {
        !matches!(self, SkipReason::MalformedField(_))
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing field {field}"),
            SkipReason::MalformedField(field) => write!(f, "malformed field {field}"),
            SkipReason::UnsupportedBlockType(block_type) => write!(f, "unsupported block type {block_type}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifiedEvent {
    BlockProposed(BlockProposal),
    FeeViolation(FeeViolation),
    DonationReceived(Donation),
    Unpublishable(SkipReason),
}

impl ClassifiedEvent {
    pub fn id(&self) -> Option<EventId> {
        match self {
            ClassifiedEvent::BlockProposed(e) => Some(e.id),
            ClassifiedEvent::FeeViolation(e) => Some(e.id),
            ClassifiedEvent::DonationReceived(e) => Some(e.id),
            ClassifiedEvent::Unpublishable(_) => None,
        }
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            ClassifiedEvent::BlockProposed(_) => Some(EventKind::BlockProposed),
            ClassifiedEvent::FeeViolation(_) => Some(EventKind::FeeViolation),
            ClassifiedEvent::DonationReceived(_) => Some(EventKind::DonationReceived),
            ClassifiedEvent::Unpublishable(_) => None,
        }
    }

    pub fn amount(&self) -> Option<WeiAmount> {
        match self {
            ClassifiedEvent::BlockProposed(e) => Some(e.reward),
            ClassifiedEvent::FeeViolation(e) => Some(e.amount),
            ClassifiedEvent::DonationReceived(e) => Some(e.amount),
            ClassifiedEvent::Unpublishable(_) => None,
        }
    }

    pub fn is_publishable(&self) -> bool {
        !matches!(self, ClassifiedEvent::Unpublishable(_))
    }
}
