use crate::rotation::RotationState;
use crate::templates::{
    BLOCK_PROPOSED_BANNER, DONATION_BANNER, DONATION_PHRASES, FEE_VIOLATION_BANNER, GRATEFUL_EMOJIS, HAPPY_EMOJIS, OPERATOR_PHRASES,
    SAD_EMOJIS,
};
use crate::text::{DEFAULT_MAX_MESSAGE_LEN, message_weight, shorten_address, truncate_message};
use herald_types_events::{BlockProposal, ClassifiedEvent, Donation, FeeViolation};
use tracing::warn;

pub const DEFAULT_SLOT_URL: &str = "https://beaconcha.in/slot/";
pub const DEFAULT_TX_URL: &str = "https://etherscan.io/tx/";

/// Turns classified events into post text.
///
/// Holds only immutable settings. The rotation state is passed in and handed back
/// so the caller owns it.
#[derive(Clone, Debug)]
pub struct MessageRenderer {
    slot_url: String,
    tx_url: String,
    max_len: usize,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self { slot_url: DEFAULT_SLOT_URL.to_string(), tx_url: DEFAULT_TX_URL.to_string(), max_len: DEFAULT_MAX_MESSAGE_LEN }
    }
}

impl MessageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link prefix for slots. A `{}` in the template is replaced, otherwise the slot is appended.
    pub fn with_slot_url(mut self, slot_url: impl Into<String>) -> Self {
        self.slot_url = slot_url.into();
        self
    }

    pub fn with_tx_url(mut self, tx_url: impl Into<String>) -> Self {
        self.tx_url = tx_url.into();
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Render `event`. Returns `None` for unpublishable events.
    pub fn render(&self, event: &ClassifiedEvent, rotation: RotationState) -> Option<(String, RotationState)> {
        let text = match event {
            ClassifiedEvent::BlockProposed(proposal) => self.render_block_proposed(proposal, rotation),
            ClassifiedEvent::FeeViolation(violation) => self.render_fee_violation(violation, rotation),
            ClassifiedEvent::DonationReceived(donation) => self.render_donation(donation, rotation),
            ClassifiedEvent::Unpublishable(_) => return None,
        };

        let length = message_weight(&text);
        if length > self.max_len {
            warn!(length, max_len = self.max_len, "Message too long, truncating");
        }
        Some((truncate_message(&text, self.max_len), rotation.advance()))
    }

    fn render_block_proposed(&self, proposal: &BlockProposal, rotation: RotationState) -> String {
        let reward = if proposal.reward.is_celebratory() {
            format!("Reward: {} ETH {}", proposal.reward.format_ether(), rotation.pick(HAPPY_EMOJIS))
        } else {
            format!("Reward: {} ETH", proposal.reward.format_ether())
        };

        format!(
            "{BLOCK_PROPOSED_BANNER}\n\n{reward}\n\n{}\nProposer validator index: {}\n{}",
            rotation.pick(OPERATOR_PHRASES),
            proposal.validator_index,
            link(&self.slot_url, &proposal.slot.to_string()),
        )
    }

    fn render_fee_violation(&self, violation: &FeeViolation, rotation: RotationState) -> String {
        format!(
            "{FEE_VIOLATION_BANNER}\n\n{} has been banned {}\nFor sending {} ETH out of the pool\n{}",
            shorten_address(&violation.withdrawal_address),
            rotation.pick(SAD_EMOJIS),
            violation.amount.format_ether(),
            link(&self.slot_url, &violation.slot.to_string()),
        )
    }

    fn render_donation(&self, donation: &Donation, rotation: RotationState) -> String {
        format!(
            "{DONATION_BANNER}\n\n{} donated {} ETH {}\n{}\n{}",
            shorten_address(&donation.donor),
            donation.amount.format_ether(),
            rotation.pick(GRATEFUL_EMOJIS),
            rotation.pick(DONATION_PHRASES),
            link(&self.tx_url, &donation.tx_hash),
        )
    }
}

fn link(template: &str, value: &str) -> String {
    if template.contains("{}") { template.replacen("{}", value, 1) } else { format!("{template}{value}") }
}
