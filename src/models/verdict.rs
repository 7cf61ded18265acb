use serde::Serialize;

use crate::domain::signal::SignalLabel;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct VcpVerdict {
    pub is_vcp: bool,
    pub tightness: Option<f64>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct SparkVerdict {
    pub is_spark: bool,
    pub rsi: Option<f64>,
    /// Volume over its 10-bar average (`None` while the average is undefined or zero)
    pub vol_ratio: Option<f64>,
}

/// Both pattern verdicts for one day. A day can be both, either, or neither.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct PatternVerdict {
    pub is_vcp: bool,
    pub tightness: Option<f64>,
    pub is_spark: bool,
    pub rsi: Option<f64>,
    pub vol_ratio: Option<f64>,
}

impl PatternVerdict {
    pub fn from_parts(vcp: VcpVerdict, spark: SparkVerdict) -> Self {
        Self {
            is_vcp: vcp.is_vcp,
            tightness: vcp.tightness,
            is_spark: spark.is_spark,
            rsi: spark.rsi,
            vol_ratio: spark.vol_ratio,
        }
    }

    pub fn fired(&self) -> bool {
        self.is_vcp || self.is_spark
    }

    pub fn label(&self) -> Option<SignalLabel> {
        SignalLabel::from_flags(self.is_vcp, self.is_spark)
    }
}
