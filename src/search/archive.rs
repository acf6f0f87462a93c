use crate::program::Program;
use crate::search::dominance::{
    self, OptimizationDirection, RankedCandidate,
};
use crate::search::genome::Genome;
use std::collections::HashSet;

/// One archived candidate: the genes, the refactorings that ran, the
/// resulting program and its objective values
#[derive(Clone, Debug)]
pub struct EliteRefactoring {
    pub genes: Genome,
    pub refactoring_signatures: Vec<String>,
    pub program: Program,
    pub objectives: Vec<f64>,
    pub pareto_rank: usize,
    pub crowding_distance: f64,
}

/// Bounded archive of the best refactored programs seen across a whole run.
///
/// Candidates are deduplicated on the canonical form of their refactored
/// program, so two gene sequences decoding to the same result occupy one
/// slot. Ranking is re-computed on every insert: Pareto rank first, crowding
/// distance as tie-breaker, worst entry trimmed once over capacity.
pub struct RefactoringArchive {
    entries: Vec<EliteRefactoring>,
    max_size: usize,
    seen_programs: HashSet<String>,
    directions: Vec<OptimizationDirection>,
}

impl RefactoringArchive {
    pub fn new(max_size: usize, directions: Vec<OptimizationDirection>) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_programs: HashSet::new(),
            directions,
        }
    }

    /// Attempt to add a candidate; duplicates of an archived program are
    /// rejected
    pub fn try_add(&mut self, entry: EliteRefactoring) -> bool {
        let canonical = entry.program.canonical_string();
        if self.seen_programs.contains(&canonical) {
            return false;
        }

        self.entries.push(entry);
        self.seen_programs.insert(canonical);
        self.sort_and_trim();

        true
    }

    fn sort_and_trim(&mut self) {
        let mut candidates: Vec<RankedCandidate<usize>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| RankedCandidate::new(i, e.objectives.clone()))
            .collect();

        let fronts = dominance::fast_non_dominated_sort(&mut candidates, &self.directions);
        for front in &fronts {
            dominance::crowding_distance(&mut candidates, front);
        }

        for candidate in &candidates {
            self.entries[candidate.data].pareto_rank = candidate.rank;
            self.entries[candidate.data].crowding_distance = candidate.crowding_distance;
        }

        self.entries.sort_by(|a, b| {
            match a.pareto_rank.cmp(&b.pareto_rank) {
                std::cmp::Ordering::Equal => b
                    .crowding_distance
                    .partial_cmp(&a.crowding_distance)
                    .unwrap_or(std::cmp::Ordering::Equal),
                other => other,
            }
        });

        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_programs.remove(&removed.program.canonical_string());
            }
        }
    }

    pub fn get_all(&self) -> &[EliteRefactoring] {
        &self.entries
    }

    pub fn get_top_n(&self, n: usize) -> &[EliteRefactoring] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
