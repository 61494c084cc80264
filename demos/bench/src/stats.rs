//! Per-algorithm benchmark accumulators.

use std::fmt;

use cp_search::PathResult;

/// Running totals over a batch of queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchStats {
    pub trials:         usize,
    pub reachable:      usize,
    pub total_ms:       f64,
    /// Time spent on reachable queries only.
    pub reachable_ms:   f64,
    pub total_weight:   f64,
    pub total_path_len: f64,
    pub total_settled:  usize,
}

impl BenchStats {
    /// Fold one query into the totals.  Time and settled nodes count for
    /// every query; weight, path length, and `reachable_ms` only for
    /// reachable ones.
    pub fn record(&mut self, result: &PathResult, settled: usize) {
        self.trials += 1;
        self.total_ms += result.elapsed_ms;
        self.total_settled += settled;
        if result.reachable {
            self.reachable += 1;
            self.reachable_ms += result.elapsed_ms;
            self.total_weight += result.weight;
            self.total_path_len += result.path.len() as f64;
        }
    }

    pub fn reachable_pct(&self) -> f64 {
        ratio(100.0 * self.reachable as f64, self.trials)
    }

    pub fn avg_ms(&self) -> f64 {
        ratio(self.total_ms, self.trials)
    }

    pub fn avg_ms_reachable(&self) -> f64 {
        ratio(self.reachable_ms, self.reachable)
    }

    pub fn avg_weight_reachable(&self) -> f64 {
        ratio(self.total_weight, self.reachable)
    }

    pub fn avg_path_len_reachable(&self) -> f64 {
        ratio(self.total_path_len, self.reachable)
    }

    pub fn avg_settled(&self) -> f64 {
        ratio(self.total_settled as f64, self.trials)
    }
}

fn ratio(total: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total / n as f64 }
}

impl fmt::Display for BenchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trials: {}", self.trials)?;
        writeln!(f, "Reachable: {} ({:.1}%)", self.reachable, self.reachable_pct())?;
        writeln!(f, "Avg time (all):             {:.4} ms", self.avg_ms())?;
        writeln!(f, "Avg time (reachable):       {:.4} ms", self.avg_ms_reachable())?;
        writeln!(f, "Avg weight (reachable):     {:.3} m", self.avg_weight_reachable())?;
        writeln!(f, "Avg path nodes (reachable): {:.3}", self.avg_path_len_reachable())?;
        write!(f, "Avg settled nodes:          {:.1}", self.avg_settled())
    }
}

/// Dijkstra average time divided by A* average time, if A* registered any.
pub fn speedup(baseline: &BenchStats, candidate: &BenchStats) -> Option<f64> {
    let candidate_ms = candidate.avg_ms();
    (candidate_ms > 0.0).then(|| baseline.avg_ms() / candidate_ms)
}

/// `true` if two results for the same pair disagree on reachability or on
/// weight beyond a relative tolerance of 1e-6.
pub fn disagree(a: &PathResult, b: &PathResult) -> bool {
    if a.reachable != b.reachable {
        return true;
    }
    let scale = a.weight.abs().max(b.weight.abs()).max(1.0);
    (a.weight - b.weight).abs() > 1e-6 * scale
}
