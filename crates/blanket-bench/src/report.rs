//! Evaluation reports: per-algorithm averages, JSON persistence, and tabular renderings.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use blanket_core::types::MbAlgorithm;
use blanket_core::BlanketConfig;

use crate::harness::{AbandonedRun, TrialStats};

/// Averages over the completed runs of one algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSummary {
    pub algorithm: MbAlgorithm,
    pub runs: usize,
    pub abandoned: usize,
    pub mean_false_positives: f64,
    pub mean_false_negatives: f64,
    pub mean_errors: f64,
    pub mean_correct: f64,
    pub mean_truth: f64,
    pub mean_elapsed_ms: f64,
    pub mean_tests: f64,
}

impl AlgorithmSummary {
    /// All means are zero when the algorithm never finished.
    pub fn from_trials(algorithm: MbAlgorithm, trials: &[TrialStats], abandoned: usize) -> Self {
        let mine: Vec<&TrialStats> = trials.iter().filter(|t| t.algorithm == algorithm).collect();
        let runs = mine.len();
        Self {
            algorithm,
            runs,
            abandoned,
            mean_false_positives: mean(&mine, |t| t.score.false_positives as f64),
            mean_false_negatives: mean(&mine, |t| t.score.false_negatives as f64),
            mean_errors: mean(&mine, |t| t.score.errors as f64),
            mean_correct: mean(&mine, |t| t.score.correct as f64),
            mean_truth: mean(&mine, |t| t.score.truth as f64),
            mean_elapsed_ms: mean(&mine, |t| t.elapsed_us as f64 / 1000.0),
            mean_tests: mean(&mine, |t| t.num_tests as f64),
        }
    }
}

fn mean(trials: &[&TrialStats], f: impl Fn(&TrialStats) -> f64) -> f64 {
    if trials.is_empty() {
        0.0
    } else {
        trials.iter().map(|t| f(*t)).sum::<f64>() / trials.len() as f64
    }
}

/// Settings a report was produced under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub num_vars: usize,
    pub edge_multiplier: f64,
    pub sample_size: usize,
    pub discrete: bool,
    pub alpha: f64,
    pub depth: String,
    pub time_limit_ms: u64,
    pub min_mb_size: usize,
    pub seed: u64,
}

impl RunSettings {
    pub fn from_config(config: &BlanketConfig) -> Self {
        let sim = &config.simulation;
        Self {
            num_vars: sim.effective_num_vars(),
            edge_multiplier: sim.effective_edge_multiplier(),
            sample_size: sim.effective_sample_size(),
            discrete: sim.effective_discrete(),
            alpha: config.search.effective_alpha(),
            depth: config.search.effective_depth().to_string(),
            time_limit_ms: u64::try_from(config.search.effective_time_limit().as_millis()).unwrap_or(u64::MAX),
            min_mb_size: sim.effective_min_mb_size(),
            seed: sim.effective_seed(),
        }
    }
}

/// Everything one evaluation run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub settings: RunSettings,
    pub trials: Vec<TrialStats>,
    pub abandoned: Vec<AbandonedRun>,
    /// One entry per configured algorithm, in configuration order.
    pub summaries: Vec<AlgorithmSummary>,
}

impl EvaluationReport {
    pub fn new(
        config: &BlanketConfig,
        algorithms: &[MbAlgorithm],
        trials: Vec<TrialStats>,
        abandoned: Vec<AbandonedRun>,
    ) -> Self {
        let summaries = algorithms
            .iter()
            .map(|&a| {
                let dropped = abandoned.iter().filter(|r| r.algorithm == a).count();
                AlgorithmSummary::from_trials(a, &trials, dropped)
            })
            .collect();
        Self {
            settings: RunSettings::from_config(config),
            trials,
            abandoned,
            summaries,
        }
    }

    pub fn summary_for(&self, algorithm: MbAlgorithm) -> Option<&AlgorithmSummary> {
        self.summaries.iter().find(|s| s.algorithm == algorithm)
    }

    pub fn num_trials(&self) -> usize {
        self.trials
            .iter()
            .map(|t| t.trial)
            .chain(self.abandoned.iter().map(|r| r.trial))
            .max()
            .map_or(0, |last| last + 1)
    }

    // -- Serialization ------------------------------------------------------

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_json())
    }

    pub fn read_from_file(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(std::io::Error::from)
    }

    // -- Tables -------------------------------------------------------------

    /// Summary table as a LaTeX `tabular`, times in seconds.
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        out.push_str("\\begin{tabular}{llllllll}\n\\hline\n");
        out.push_str("#vars&Algorithm&FP&FN&Err&Corr&Truth&Time\\\\\n\\hline\n");
        for s in &self.summaries {
            let _ = writeln!(
                out,
                "{}&{}&{:.3}&{:.3}&{:.3}&{:.3}&{:.3}&{:.3}\\\\",
                self.settings.num_vars,
                s.algorithm,
                s.mean_false_positives,
                s.mean_false_negatives,
                s.mean_errors,
                s.mean_correct,
                s.mean_truth,
                s.mean_elapsed_ms / 1000.0,
            );
        }
        out.push_str("\\hline\n\\end{tabular}\n");
        out
    }

    /// Per-trial rows, tab separated, with a header line.
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("trial\talgorithm\ttarget\tfp\tfn\terr\tcorr\ttruth\ttime_ms\ttests\n");
        for t in &self.trials {
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.3}\t{}",
                t.trial + 1,
                t.algorithm,
                t.target,
                t.score.false_positives,
                t.score.false_negatives,
                t.score.errors,
                t.score.correct,
                t.score.truth,
                t.elapsed_us as f64 / 1000.0,
                t.num_tests,
            );
        }
        out
    }

    /// Human-readable digest for logs.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "MARKOV BLANKET EVALUATION: {} trials, {} vars, {} data",
            self.num_trials(),
            self.settings.num_vars,
            if self.settings.discrete { "discrete" } else { "continuous" },
        );
        for s in &self.summaries {
            let _ = writeln!(
                out,
                "  {:<14} runs={:<3} abandoned={:<3} fp={:.2} fn={:.2} time={:.1}ms",
                s.algorithm.name(),
                s.runs,
                s.abandoned,
                s.mean_false_positives,
                s.mean_false_negatives,
                s.mean_elapsed_ms,
            );
        }
        out
    }
}
