//! Market configuration: versioned risk, fee, and oracle singletons.
//!
//! All mutation goes through [`MarketConfig::update`], which dispatches
//! on a fixed set of string keys, checked-narrows the wire value into
//! the field's declared width, range-checks it, and re-validates the
//! standing invariants before committing. A rejected update leaves
//! every field untouched.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tenora_math::narrowing::{decimal_from_wad, narrow_u64};

use crate::error::{TenoraResult, ValidationError};
use crate::types::{Ratio, Tenor};

/// Risk parameters gating position creation and liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Shortest tenor any curve knot or order may carry.
    pub min_tenor: Tenor,
    /// Longest tenor any curve knot or order may carry.
    pub max_tenor: Tenor,
    /// Collateral ratio below which a debt position is liquidatable.
    pub min_collateral_ratio: Ratio,
}

/// Fee parameters applied by matching and liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Annualized fee applied to matched principal.
    pub swap_fee_apr: Ratio,
    /// Flat fee charged when a credit position is split.
    pub fragmentation_fee: Decimal,
    /// Share of seized collateral awarded to a third-party liquidator.
    pub liquidation_reward_ratio: Ratio,
    /// Share of the post-reward collateral remainder retained by the
    /// protocol when the liquidated position was overdue.
    pub overdue_collateral_protocol_ratio: Ratio,
}

/// Oracle acceptance parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Maximum age of a reading before it is rejected as stale.
    pub staleness_interval: Tenor,
}

/// The versioned configuration singleton.
///
/// Market actions take a copy of this snapshot at transaction start;
/// updates are serialized relative to in-flight actions by the `&mut`
/// receiver, so no action ever observes a half-applied configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Monotonic record version, bumped on every committed update.
    pub version: u32,
    /// Risk parameters.
    pub risk: RiskConfig,
    /// Fee parameters.
    pub fees: FeeConfig,
    /// Oracle acceptance parameters.
    pub oracle: OracleConfig,
}

/// The fixed set of updatable configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigKey {
    /// `min_tenor`, seconds.
    MinTenor,
    /// `max_tenor`, seconds.
    MaxTenor,
    /// `min_collateral_ratio`, WAD-scaled ratio.
    MinCollateralRatio,
    /// `swap_fee_apr`, WAD-scaled ratio.
    SwapFeeApr,
    /// `fragmentation_fee`, WAD-scaled amount.
    FragmentationFee,
    /// `liquidation_reward_ratio`, WAD-scaled ratio.
    LiquidationRewardRatio,
    /// `overdue_collateral_protocol_ratio`, WAD-scaled ratio.
    OverdueCollateralProtocolRatio,
    /// `staleness_interval`, seconds.
    StalenessInterval,
}

impl ConfigKey {
    /// The canonical string form of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MinTenor => "min_tenor",
            Self::MaxTenor => "max_tenor",
            Self::MinCollateralRatio => "min_collateral_ratio",
            Self::SwapFeeApr => "swap_fee_apr",
            Self::FragmentationFee => "fragmentation_fee",
            Self::LiquidationRewardRatio => "liquidation_reward_ratio",
            Self::OverdueCollateralProtocolRatio => "overdue_collateral_protocol_ratio",
            Self::StalenessInterval => "staleness_interval",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min_tenor" => Ok(Self::MinTenor),
            "max_tenor" => Ok(Self::MaxTenor),
            "min_collateral_ratio" => Ok(Self::MinCollateralRatio),
            "swap_fee_apr" => Ok(Self::SwapFeeApr),
            "fragmentation_fee" => Ok(Self::FragmentationFee),
            "liquidation_reward_ratio" => Ok(Self::LiquidationRewardRatio),
            "overdue_collateral_protocol_ratio" => Ok(Self::OverdueCollateralProtocolRatio),
            "staleness_interval" => Ok(Self::StalenessInterval),
            _ => Err(ValidationError::InvalidKey { key: s.to_string() }),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            version: 1,
            risk: RiskConfig {
                min_tenor: Tenor::from_seconds(3_600),
                max_tenor: Tenor::from_days(5 * 365),
                min_collateral_ratio: Ratio::new(dec!(1.3)),
            },
            fees: FeeConfig {
                swap_fee_apr: Ratio::new(dec!(0.005)),
                fragmentation_fee: dec!(5),
                liquidation_reward_ratio: Ratio::new(dec!(0.05)),
                overdue_collateral_protocol_ratio: Ratio::new(dec!(0.01)),
            },
            oracle: OracleConfig {
                staleness_interval: Tenor::from_seconds(3_600),
            },
        }
    }
}

impl MarketConfig {
    /// Applies a keyed update from a raw wire value.
    ///
    /// Tenors and intervals arrive as whole seconds, ratios and amounts
    /// as WAD-scaled (`10^18`) integers. The value is checked-narrowed
    /// into the field's width and range-checked; updates touching
    /// either tenor bound re-validate `min_tenor < max_tenor`. A
    /// rejected update mutates nothing.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for an unknown key, `Overflow` when the value does
    /// not fit the field, `ValueOutOfRange` when it fails its range
    /// check.
    pub fn update(&mut self, key: &str, raw: u128) -> TenoraResult<()> {
        let key: ConfigKey = key.parse()?;

        let mut candidate = *self;
        match key {
            ConfigKey::MinTenor => {
                candidate.risk.min_tenor = Tenor::from_seconds(narrow_seconds(key, raw)?);
            }
            ConfigKey::MaxTenor => {
                candidate.risk.max_tenor = Tenor::from_seconds(narrow_seconds(key, raw)?);
            }
            ConfigKey::MinCollateralRatio => {
                let ratio = narrow_ratio(key, raw)?;
                if ratio < Ratio::ONE {
                    return Err(ValidationError::ValueOutOfRange {
                        key: key.as_str(),
                        reason: format!("{ratio} is below 1; positions must be over-collateralized"),
                    }
                    .into());
                }
                candidate.risk.min_collateral_ratio = ratio;
            }
            ConfigKey::SwapFeeApr => {
                let ratio = narrow_ratio(key, raw)?;
                if ratio >= Ratio::ONE {
                    return Err(ValidationError::ValueOutOfRange {
                        key: key.as_str(),
                        reason: format!("{ratio} is not below 1"),
                    }
                    .into());
                }
                candidate.fees.swap_fee_apr = ratio;
            }
            ConfigKey::FragmentationFee => {
                candidate.fees.fragmentation_fee = narrow_ratio(key, raw)?.as_decimal();
            }
            ConfigKey::LiquidationRewardRatio => {
                let ratio = narrow_ratio(key, raw)?;
                if ratio >= Ratio::ONE {
                    return Err(ValidationError::ValueOutOfRange {
                        key: key.as_str(),
                        reason: format!("{ratio} is not below 1"),
                    }
                    .into());
                }
                candidate.fees.liquidation_reward_ratio = ratio;
            }
            ConfigKey::OverdueCollateralProtocolRatio => {
                let ratio = narrow_ratio(key, raw)?;
                if ratio >= Ratio::ONE {
                    return Err(ValidationError::ValueOutOfRange {
                        key: key.as_str(),
                        reason: format!("{ratio} is not below 1"),
                    }
                    .into());
                }
                candidate.fees.overdue_collateral_protocol_ratio = ratio;
            }
            ConfigKey::StalenessInterval => {
                let seconds = narrow_seconds(key, raw)?;
                if seconds == 0 {
                    return Err(ValidationError::ValueOutOfRange {
                        key: key.as_str(),
                        reason: "staleness interval must be positive".to_string(),
                    }
                    .into());
                }
                candidate.oracle.staleness_interval = Tenor::from_seconds(seconds);
            }
        }

        // Standing invariant, re-checked on every mutation rather than
        // only at initialization.
        candidate.validate_tenor_bounds()?;

        candidate.version = self.version + 1;
        log::debug!(
            "config update {} committed, version {} -> {}",
            key.as_str(),
            self.version,
            candidate.version
        );
        *self = candidate;
        Ok(())
    }

    fn validate_tenor_bounds(&self) -> Result<(), ValidationError> {
        if self.risk.min_tenor.is_zero() {
            return Err(ValidationError::ValueOutOfRange {
                key: ConfigKey::MinTenor.as_str(),
                reason: "min_tenor must be positive".to_string(),
            });
        }
        if self.risk.min_tenor >= self.risk.max_tenor {
            return Err(ValidationError::ValueOutOfRange {
                key: ConfigKey::MaxTenor.as_str(),
                reason: format!(
                    "min_tenor {} must be strictly below max_tenor {}",
                    self.risk.min_tenor, self.risk.max_tenor
                ),
            });
        }
        Ok(())
    }
}

fn narrow_seconds(key: ConfigKey, raw: u128) -> Result<u64, ValidationError> {
    narrow_u64(raw).map_err(|_| ValidationError::Overflow {
        key: key.as_str(),
        value: raw,
        width: "u64",
    })
}

fn narrow_ratio(key: ConfigKey, raw: u128) -> Result<Ratio, ValidationError> {
    decimal_from_wad(raw).map(Ratio::new).map_err(|_| ValidationError::Overflow {
        key: key.as_str(),
        value: raw,
        width: "Decimal",
    })
}
