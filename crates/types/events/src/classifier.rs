use crate::event::{BlockProposal, ClassifiedEvent, Donation, EventId, FeeViolation, SkipReason};
use crate::record::{EventRecord, RecordSource};
use tracing::{trace, warn};

pub const BLOCK_TYPE_OK_PROPOSAL: &str = "okpoolproposal";
pub const BLOCK_TYPE_OK_PROPOSAL_BLS_KEYS: &str = "okpoolproposalblskeys";
pub const BLOCK_TYPE_WRONG_FEE_RECIPIENT: &str = "wrongfeerecipient";

const BLOCK_KEYS: &[&str] = &["block", "block_number"];
const SLOT_KEYS: &[&str] = &["slot"];
const BLOCK_TYPE_KEYS: &[&str] = &["block_type"];
const REWARD_KEYS: &[&str] = &["reward_wei"];
const VALIDATOR_INDEX_KEYS: &[&str] = &["validator_index"];
const WITHDRAWAL_ADDRESS_KEYS: &[&str] = &["withdrawal_address"];

const DONATION_AMOUNT_KEYS: &[&str] = &["amount_wei", "donation_amount_wei"];
const DONOR_KEYS: &[&str] = &["sender", "donor"];
const TX_HASH_KEYS: &[&str] = &["tx_hash"];

/// Turn one raw record into a publishable event, or say why it is not one.
///
/// Field presence is checked here and only here, so everything downstream works
/// on fully populated variants.
pub fn classify(record: &EventRecord, source: RecordSource) -> ClassifiedEvent {
    let classified = match source {
        RecordSource::Oracle => classify_oracle_block(record),
        RecordSource::Donations => classify_donation(record),
    };

    match classified {
        Ok(event) => event,
        Err(reason) => {
            if reason.is_expected() {
                trace!(%source, %reason, "Record is not publishable");
            } else {
                warn!(%source, %reason, "Record does not match the expected feed format");
            }
            ClassifiedEvent::Unpublishable(reason)
        }
    }
}

/// Identifier of a record regardless of whether it is publishable. Every feed keys
/// records by block number, under `block` or `block_number`.
pub fn record_id(record: &EventRecord) -> Option<EventId> {
    record.u64_field(BLOCK_KEYS).ok()
}

fn classify_oracle_block(record: &EventRecord) -> Result<ClassifiedEvent, SkipReason> {
    // blocks without a reward (missed proposals and the like) are expected
    let reward = record.wei_field(REWARD_KEYS)?;
    let block_type = record.str_field(BLOCK_TYPE_KEYS)?;
    let id = record.u64_field(BLOCK_KEYS)?;

    match block_type {
        BLOCK_TYPE_WRONG_FEE_RECIPIENT => Ok(ClassifiedEvent::FeeViolation(FeeViolation {
            id,
            slot: record.u64_field(SLOT_KEYS)?,
            withdrawal_address: record.str_field(WITHDRAWAL_ADDRESS_KEYS)?.to_string(),
            amount: reward,
        })),
        BLOCK_TYPE_OK_PROPOSAL | BLOCK_TYPE_OK_PROPOSAL_BLS_KEYS => Ok(ClassifiedEvent::BlockProposed(BlockProposal {
            id,
            slot: record.u64_field(SLOT_KEYS)?,
            validator_index: record.u64_field(VALIDATOR_INDEX_KEYS)?,
            reward,
        })),
        other => Err(SkipReason::UnsupportedBlockType(other.to_string())),
    }
}

fn classify_donation(record: &EventRecord) -> Result<ClassifiedEvent, SkipReason> {
    let amount = record.wei_field(DONATION_AMOUNT_KEYS)?;

    Ok(ClassifiedEvent::DonationReceived(Donation {
        id: record.u64_field(BLOCK_KEYS)?,
        donor: record.str_field(DONOR_KEYS)?.to_string(),
        amount,
        tx_hash: record.str_field(TX_HASH_KEYS)?.to_string(),
    }))
}
