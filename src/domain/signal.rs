use serde::{Deserialize, Serialize};

/// Which pattern(s) fired on a given day.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum SignalLabel {
    #[serde(rename = "VCP")]
    #[strum(serialize = "VCP")]
    Vcp,
    #[serde(rename = "Spark")]
    #[strum(serialize = "Spark")]
    Spark,
    #[serde(rename = "VCP+Spark")]
    #[strum(serialize = "VCP+Spark")]
    VcpSpark,
}

impl SignalLabel {
    /// `None` when neither pattern fired.
    pub fn from_flags(is_vcp: bool, is_spark: bool) -> Option<Self> {
        match (is_vcp, is_spark) {
            (true, true) => Some(SignalLabel::VcpSpark),
            (true, false) => Some(SignalLabel::Vcp),
            (false, true) => Some(SignalLabel::Spark),
            (false, false) => None,
        }
    }

    pub fn includes_vcp(&self) -> bool {
        matches!(self, SignalLabel::Vcp | SignalLabel::VcpSpark)
    }

    pub fn includes_spark(&self) -> bool {
        matches!(self, SignalLabel::Spark | SignalLabel::VcpSpark)
    }
}
