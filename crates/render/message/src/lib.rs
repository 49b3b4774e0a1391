pub use renderer::{DEFAULT_SLOT_URL, DEFAULT_TX_URL, MessageRenderer};
pub use rotation::RotationState;
pub use text::{DEFAULT_MAX_MESSAGE_LEN, ELLIPSIS, LINK_WEIGHT, message_weight, shorten_address, truncate_message};

mod renderer;
mod rotation;
mod templates;
mod text;
