//! Closed set of Markov blanket search strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Markov blanket search strategy. Names are only parsed at the config boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MbAlgorithm {
    GrowShrink,
    Iamb,
    InterIamb,
    IambnPc,
    InterIambnPc,
    HitonMb,
    HitonMbSym,
    Mmmb,
    MmmbSym,
    Pcmb,
    Mbfs,
}

impl MbAlgorithm {
    pub const ALL: [MbAlgorithm; 11] = [
        MbAlgorithm::Pcmb,
        MbAlgorithm::GrowShrink,
        MbAlgorithm::Iamb,
        MbAlgorithm::IambnPc,
        MbAlgorithm::InterIamb,
        MbAlgorithm::InterIambnPc,
        MbAlgorithm::HitonMb,
        MbAlgorithm::HitonMbSym,
        MbAlgorithm::Mmmb,
        MbAlgorithm::MmmbSym,
        MbAlgorithm::Mbfs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MbAlgorithm::GrowShrink => "GS",
            MbAlgorithm::Iamb => "IAMB",
            MbAlgorithm::InterIamb => "InterIAMB",
            MbAlgorithm::IambnPc => "IAMBnPC",
            MbAlgorithm::InterIambnPc => "InterIAMBnPC",
            MbAlgorithm::HitonMb => "HITON-MB",
            MbAlgorithm::HitonMbSym => "HITON-MB-SYM",
            MbAlgorithm::Mmmb => "MMMB",
            MbAlgorithm::MmmbSym => "MMMB-SYM",
            MbAlgorithm::Pcmb => "PCMB",
            MbAlgorithm::Mbfs => "MBFS",
        }
    }
}

impl fmt::Display for MbAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MbAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MbAlgorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown Markov blanket algorithm: {s}"))
    }
}

impl TryFrom<String> for MbAlgorithm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MbAlgorithm> for String {
    fn from(algorithm: MbAlgorithm) -> Self {
        algorithm.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        for algorithm in MbAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<MbAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!("hiton-mb-sym".parse::<MbAlgorithm>().unwrap(), MbAlgorithm::HitonMbSym);
        assert!("GES".parse::<MbAlgorithm>().is_err());
    }
}
