use serde::{Deserialize, Serialize};
use std::fmt;

/// チャーン確率から決まるリスク区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

const HIGH_THRESHOLD: f64 = 0.7;
const MEDIUM_THRESHOLD: f64 = 0.4;

/// `p > 0.7` → High、`0.4 < p <= 0.7` → Medium、それ以外 → Low。
///
/// 境界値はどちらも下の区分に入る（0.7 は Medium、0.4 は Low）。
/// [0, 1] の範囲外も検証せずに同じ比較を適用する。NaN は Low。
pub fn tier(probability: f64) -> RiskTier {
    if probability > HIGH_THRESHOLD {
        RiskTier::High
    } else if probability > MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

impl RiskTier {
    pub const fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "High",
            RiskTier::Medium => "Medium",
            RiskTier::Low => "Low",
        }
    }

    pub const fn color(&self) -> &'static str {
        match self {
            RiskTier::High => "#ef4444",
            RiskTier::Medium => "#f59e0b",
            RiskTier::Low => "#10b981",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            RiskTier::High => "🔴",
            RiskTier::Medium => "🟡",
            RiskTier::Low => "🟢",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(tier(0.7), RiskTier::Medium);
        assert_eq!(tier(0.70001), RiskTier::High);
        assert_eq!(tier(0.4), RiskTier::Low);
        assert_eq!(tier(0.40001), RiskTier::Medium);
    }

    #[test]
    fn test_representative_values() {
        assert_eq!(tier(0.85), RiskTier::High);
        assert_eq!(tier(0.5), RiskTier::Medium);
        assert_eq!(tier(0.1), RiskTier::Low);
    }

    #[test]
    fn test_out_of_range_is_permissive() {
        assert_eq!(tier(1.5), RiskTier::High);
        assert_eq!(tier(-0.2), RiskTier::Low);
        assert_eq!(tier(f64::NAN), RiskTier::Low);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(RiskTier::High.color(), "#ef4444");
        assert_eq!(RiskTier::Medium.label(), "Medium");
        assert_eq!(RiskTier::Low.to_string(), "Low");
    }
}
