use crate::error::AnalysisError;
use crate::metrics::derive::derive_axis;
use crate::metrics::{DerivedAxis, SamplingInterval};
use crate::tlog::Mlc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    A,
    B,
}

/// Leaves numbered up to and including `last_a` form bank A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSplit {
    last_a: usize,
}

impl BankSplit {
    /// Half of the head, rounded down (leaf 60 on a 120-leaf MLC).
    pub fn halves(num_leaves: usize) -> Self {
        Self {
            last_a: num_leaves / 2,
        }
    }

    pub fn new(last_a: usize, num_leaves: usize) -> Result<Self, AnalysisError> {
        if last_a == 0 || last_a > num_leaves {
            return Err(AnalysisError::configuration(format!(
                "bank split {} outside 1..={} leaves",
                last_a, num_leaves
            )));
        }
        Ok(Self { last_a })
    }

    pub fn resolve(configured: Option<usize>, num_leaves: usize) -> Result<Self, AnalysisError> {
        match configured {
            Some(last_a) => Self::new(last_a, num_leaves),
            None => Ok(Self::halves(num_leaves)),
        }
    }

    pub fn last_a(&self) -> usize {
        self.last_a
    }

    pub fn bank_of(&self, leaf: usize) -> Bank {
        if leaf <= self.last_a { Bank::A } else { Bank::B }
    }
}

/// Samples pooled over every moved leaf of one bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankSamples {
    pub leaves: Vec<usize>,
    pub error: Vec<f64>,
    pub speed: Vec<f64>,
    pub speed_error: Vec<f64>,
}

impl BankSamples {
    fn extend(&mut self, leaf: usize, derived: &DerivedAxis) {
        self.leaves.push(leaf);
        self.error.extend_from_slice(&derived.difference);
        self.speed.extend_from_slice(&derived.speed_actual);
        self.speed_error.extend_from_slice(&derived.speed_error);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafMetrics {
    pub leaf: usize,
    pub bank: Bank,
    pub derived: DerivedAxis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MlcMetrics {
    pub num_leaves: usize,
    pub split: BankSplit,
    /// Moved leaves only, ascending by leaf number.
    pub leaves: Vec<LeafMetrics>,
    pub bank_a: BankSamples,
    pub bank_b: BankSamples,
}

impl MlcMetrics {
    pub fn moved_leaves(&self) -> Vec<usize> {
        self.leaves.iter().map(|l| l.leaf).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

pub fn derive_mlc(
    mlc: &Mlc,
    split: BankSplit,
    moved_threshold: f64,
    dt: SamplingInterval,
) -> MlcMetrics {
    let mut leaves = Vec::new();
    let mut bank_a = BankSamples::default();
    let mut bank_b = BankSamples::default();

    for leaf in 1..=mlc.num_leaves() {
        if !mlc.leaf_moved(leaf, moved_threshold) {
            continue;
        }
        let Some(axis) = mlc.leaf(leaf) else {
            continue;
        };
        let derived = derive_axis(axis, dt);
        let bank = split.bank_of(leaf);
        match bank {
            Bank::A => bank_a.extend(leaf, &derived),
            Bank::B => bank_b.extend(leaf, &derived),
        }
        leaves.push(LeafMetrics {
            leaf,
            bank,
            derived,
        });
    }

    MlcMetrics {
        num_leaves: mlc.num_leaves(),
        split,
        leaves,
        bank_a,
        bank_b,
    }
}

/// Splits into `[0, len/2)` and `[len/2, len)`; every item lands in exactly
/// one half.
pub fn split_halves<T>(items: &[T]) -> (&[T], &[T]) {
    items.split_at(items.len() / 2)
}
