pub(crate) const HAPPY_EMOJIS: &[&str] = &["🥳", "😊", "😄"];
pub(crate) const SAD_EMOJIS: &[&str] = &["😔", "😞", "😢"];
pub(crate) const GRATEFUL_EMOJIS: &[&str] = &["🙏", "💜", "🫶"];

pub(crate) const OPERATOR_PHRASES: &[&str] = &[
    "From a ☁️ Smooth Operator 😏",
    "Courtesy of a 🌤️ Smooth Operator 🤗",
    "Brought to you by a 🌬️ Smooth Operator 😎",
];

pub(crate) const DONATION_PHRASES: &[&str] = &[
    "Every solo staker in the pool gets a slice 🍰",
    "Shared with all Smooth validators 🤝",
    "Smooth just got a little smoother 🧈",
];

pub(crate) const BLOCK_PROPOSED_BANNER: &str = "💰 NEW BLOCK IN SMOOTH 💰";
pub(crate) const FEE_VIOLATION_BANNER: &str = "⛔ BANNED FROM SMOOTH ⛔";
pub(crate) const DONATION_BANNER: &str = "💸 NEW DONATION TO SMOOTH 💸";
