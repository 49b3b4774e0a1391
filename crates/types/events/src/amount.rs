use alloy_primitives::U256;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits shown for ether amounts
const DISPLAY_DECIMALS: u32 = 4;

const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
/// 10^(18 - DISPLAY_DECIMALS)
const WEI_PER_DISPLAY_UNIT: U256 = U256::from_limbs([100_000_000_000_000, 0, 0, 0]);
/// 10^DISPLAY_DECIMALS
const DISPLAY_UNITS_PER_ETHER: U256 = U256::from_limbs([10_000, 0, 0, 0]);

/// Rewards strictly above 0.1 ETH get a celebratory decoration
pub const CELEBRATION_THRESHOLD: WeiAmount = WeiAmount(U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid wei amount {0:?}")]
    Invalid(String),
}

/// Integer amount of wei (10^-18 ETH).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeiAmount(U256);

impl WeiAmount {
    pub const ZERO: WeiAmount = WeiAmount(U256::ZERO);

    pub const fn new(wei: U256) -> Self {
        Self(wei)
    }

    pub fn from_wei(wei: u128) -> Self {
        Self(U256::from(wei))
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    /// Whole ether part, truncated
    pub fn whole_ether(&self) -> U256 {
        self.0 / WEI_PER_ETHER
    }

    pub fn is_celebratory(&self) -> bool {
        *self > CELEBRATION_THRESHOLD
    }

    /// Ether value with exactly four decimals, rounding half away from zero.
    ///
    /// Done entirely in 256-bit integers so values around the 0.1 ETH threshold
    /// never pick up float error.
    pub fn format_ether(&self) -> String {
        let mut units = self.0 / WEI_PER_DISPLAY_UNIT;
        let remainder = self.0 % WEI_PER_DISPLAY_UNIT;
        if remainder * U256::from(2) >= WEI_PER_DISPLAY_UNIT {
            units += U256::from(1);
        }

        let whole = units / DISPLAY_UNITS_PER_ETHER;
        let fraction = (units % DISPLAY_UNITS_PER_ETHER).to::<u64>();
        format!("{whole}.{fraction:0width$}", width = DISPLAY_DECIMALS as usize)
    }
}

impl Display for WeiAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ETH", self.format_ether())
    }
}

impl FromStr for WeiAmount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        U256::from_str_radix(s, 10).map(WeiAmount).map_err(|_| AmountParseError::Invalid(s.to_string()))
    }
}

impl From<U256> for WeiAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}
