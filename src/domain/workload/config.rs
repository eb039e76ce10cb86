use crate::error::{Error, Result};

/// The workload parameters: parallelism degrees, microbatch count,
/// per-microbatch compute durations and per-invocation transfer sizes.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct WorkloadConfig {
    pub pp: usize,
    pub dp: usize,
    pub tp: usize,
    pub microbatches: usize,

    pub fwd_comp_time: f64,
    pub bwd_comp_time: f64,

    pub fwd_tp_size: f64,
    pub bwd_tp_size: f64,
    pub fwd_pp_size: f64,
    pub bwd_pp_size: f64,
    pub dp_size: f64,
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pp == 0 || self.dp == 0 || self.tp == 0 {
            return Err(Error::Structural("PP, DP and TP must all be positive".into()));
        }
        if self.microbatches == 0 {
            return Err(Error::Structural("microbatches must be positive".into()));
        }
        if self.microbatches < self.pp {
            return Err(Error::Structural(format!("microbatches ({}) must be >= PP ({})", self.microbatches, self.pp)));
        }

        let numerics = [
            ("fwdCompTime", self.fwd_comp_time),
            ("bwdCompTime", self.bwd_comp_time),
            ("fwdTPSize", self.fwd_tp_size),
            ("bwdTPSize", self.bwd_tp_size),
            ("fwdPPSize", self.fwd_pp_size),
            ("bwdPPSize", self.bwd_pp_size),
            ("dpSize", self.dp_size),
        ];
        for (name, value) in numerics {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Numeric(format!("{} must be finite and non-negative, got {}", name, value)));
            }
        }

        Ok(())
    }

    pub fn total_ranks(&self) -> usize {
        self.pp * self.dp * self.tp
    }
}
