//! Pareto dominance over competing quality objectives, plus the NSGA-II
//! ranking machinery (fast non-dominated sorting and crowding distance)
//! the outer search loop builds its selection on.

use crate::search::chromosome::RefactorSequence;
use crate::search::fitness::FitnessFunction;
use std::sync::Arc;

/// Whether an objective should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

/// Does `a` Pareto-dominate `b` under the given ordered objective list?
///
/// Classical Pareto dominance: `a` dominates `b` when it is no worse on
/// every objective and strictly better on at least one. Values come out of
/// each chromosome's memoized fitness cache, so no objective is ever
/// re-evaluated per comparison; an early non-dominance verdict skips the
/// remaining objectives entirely. The relation is irreflexive and
/// asymmetric.
pub fn dominates(
    a: &RefactorSequence,
    b: &RefactorSequence,
    objectives: &[Arc<dyn FitnessFunction>],
) -> bool {
    let mut dominates_at_least_one = false;

    for objective in objectives {
        let fa = a.fitness_of(objective.as_ref());
        let fb = b.fitness_of(objective.as_ref());

        let (a_better, b_better) = if objective.is_minimizing() {
            (fb > fa, fa > fb)
        } else {
            (fa > fb, fb > fa)
        };

        if b_better {
            return false;
        }
        if a_better {
            dominates_at_least_one = true;
        }
    }

    dominates_at_least_one
}

/// Dominance over already-extracted objective values; the value-level core
/// backing non-dominated sorting, where every candidate's values are known
/// up front
pub fn dominates_values(
    a_values: &[f64],
    b_values: &[f64],
    directions: &[OptimizationDirection],
) -> bool {
    if a_values.len() != b_values.len() || a_values.len() != directions.len() {
        return false;
    }

    let mut dominates_at_least_one = false;

    for ((&fa, &fb), direction) in a_values.iter().zip(b_values).zip(directions) {
        let (a_better, b_better) = match direction {
            OptimizationDirection::Maximize => (fa > fb, fb > fa),
            OptimizationDirection::Minimize => (fa < fb, fb < fa),
        };

        if b_better {
            return false;
        }
        if a_better {
            dominates_at_least_one = true;
        }
    }

    dominates_at_least_one
}

/// Candidate in the ranking: its objective values plus the rank and crowding
/// distance assigned by the sort
#[derive(Debug, Clone)]
pub struct RankedCandidate<T> {
    pub data: T,
    pub objectives: Vec<f64>,
    pub rank: usize,
    pub crowding_distance: f64,
}

impl<T> RankedCandidate<T> {
    pub fn new(data: T, objectives: Vec<f64>) -> Self {
        Self {
            data,
            objectives,
            rank: 0,
            crowding_distance: 0.0,
        }
    }
}

/// Fast non-dominated sorting (NSGA-II).
///
/// Assigns every candidate its Pareto rank and returns the fronts as index
/// lists, front 0 being the non-dominated set.
pub fn fast_non_dominated_sort<T>(
    candidates: &mut [RankedCandidate<T>],
    directions: &[OptimizationDirection],
) -> Vec<Vec<usize>> {
    let n = candidates.len();

    let mut domination_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();

    let mut first_front = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if dominates_values(&candidates[i].objectives, &candidates[j].objectives, directions) {
                dominated[i].push(j);
            } else if dominates_values(
                &candidates[j].objectives,
                &candidates[i].objectives,
                directions,
            ) {
                domination_count[i] += 1;
            }
        }

        if domination_count[i] == 0 {
            candidates[i].rank = 0;
            first_front.push(i);
        }
    }

    fronts.push(first_front);

    let mut front_index = 0;
    while front_index < fronts.len() && !fronts[front_index].is_empty() {
        let mut next_front = Vec::new();

        for &i in &fronts[front_index] {
            for &j in &dominated[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    candidates[j].rank = front_index + 1;
                    next_front.push(j);
                }
            }
        }

        if !next_front.is_empty() {
            fronts.push(next_front);
        }
        front_index += 1;
    }

    fronts
}

/// Crowding distance within one front: boundary candidates get infinity,
/// interior ones the normalized spread of their neighbours per objective.
/// Higher means more isolated, which selection prefers for diversity.
pub fn crowding_distance<T>(candidates: &mut [RankedCandidate<T>], front: &[usize]) {
    let front_size = front.len();

    if front_size <= 2 {
        for &idx in front {
            candidates[idx].crowding_distance = f64::INFINITY;
        }
        return;
    }

    for &idx in front {
        candidates[idx].crowding_distance = 0.0;
    }

    let num_objectives = candidates[front[0]].objectives.len();

    for obj in 0..num_objectives {
        let mut sorted: Vec<usize> = front.to_vec();
        sorted.sort_by(|&a, &b| {
            candidates[a].objectives[obj]
                .partial_cmp(&candidates[b].objectives[obj])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        candidates[sorted[0]].crowding_distance = f64::INFINITY;
        candidates[sorted[front_size - 1]].crowding_distance = f64::INFINITY;

        let min_val = candidates[sorted[0]].objectives[obj];
        let max_val = candidates[sorted[front_size - 1]].objectives[obj];
        let range = max_val - min_val;
        if range.abs() < 1e-10 {
            continue;
        }

        for i in 1..(front_size - 1) {
            let prev = candidates[sorted[i - 1]].objectives[obj];
            let next = candidates[sorted[i + 1]].objectives[obj];
            candidates[sorted[i]].crowding_distance += (next - prev) / range;
        }
    }
}

/// Crowded-comparison operator: lower rank wins, ties broken by higher
/// crowding distance
pub fn crowded_comparison<T>(a: &RankedCandidate<T>, b: &RankedCandidate<T>) -> bool {
    if a.rank != b.rank {
        return a.rank < b.rank;
    }
    a.crowding_distance > b.crowding_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Program, Target};
    use crate::refactorings::{Refactoring, RefactoringFinder};
    use crate::search::chromosome::RefactorSequence;

    #[test]
    fn test_dominance_values_minimize() {
        let directions = vec![
            OptimizationDirection::Minimize,
            OptimizationDirection::Minimize,
        ];

        assert!(dominates_values(&[1.0, 2.0], &[3.0, 4.0], &directions));
        assert!(dominates_values(&[1.0, 2.0], &[1.0, 4.0], &directions));
        assert!(!dominates_values(&[1.0, 4.0], &[3.0, 2.0], &directions));
        assert!(!dominates_values(&[1.0, 2.0], &[1.0, 2.0], &directions));
    }

    #[test]
    fn test_dominance_values_mixed() {
        let directions = vec![
            OptimizationDirection::Maximize,
            OptimizationDirection::Minimize,
        ];

        assert!(dominates_values(&[10.0, 5.0], &[5.0, 10.0], &directions));
        assert!(!dominates_values(&[10.0, 15.0], &[5.0, 10.0], &directions));
    }

    #[test]
    fn test_dominance_values_asymmetry() {
        let directions = vec![
            OptimizationDirection::Minimize,
            OptimizationDirection::Maximize,
        ];
        let pairs = [
            ([1.0, 2.0], [3.0, 1.0]),
            ([1.0, 2.0], [1.0, 2.0]),
            ([2.0, 5.0], [1.0, 9.0]),
        ];
        for (a, b) in pairs {
            assert!(!(dominates_values(&a, &b, &directions)
                && dominates_values(&b, &a, &directions)));
        }
    }

    #[test]
    fn test_fast_non_dominated_sort_fronts() {
        let directions = vec![
            OptimizationDirection::Maximize,
            OptimizationDirection::Maximize,
        ];

        let mut candidates = vec![
            RankedCandidate::new(0, vec![1.0, 5.0]),
            RankedCandidate::new(1, vec![3.0, 3.0]),
            RankedCandidate::new(2, vec![5.0, 1.0]),
            RankedCandidate::new(3, vec![2.0, 2.0]),
            RankedCandidate::new(4, vec![1.0, 1.0]),
        ];

        let fronts = fast_non_dominated_sort(&mut candidates, &directions);

        assert_eq!(fronts.len(), 3);
        assert_eq!(fronts[0].len(), 3);
        assert_eq!(candidates[0].rank, 0);
        assert_eq!(candidates[1].rank, 0);
        assert_eq!(candidates[2].rank, 0);
        assert_eq!(candidates[3].rank, 1);
        assert_eq!(candidates[4].rank, 2);
    }

    #[test]
    fn test_crowding_distance_boundaries() {
        let directions = vec![
            OptimizationDirection::Maximize,
            OptimizationDirection::Maximize,
        ];

        let mut candidates = vec![
            RankedCandidate::new(0, vec![1.0, 5.0]),
            RankedCandidate::new(1, vec![3.0, 3.0]),
            RankedCandidate::new(2, vec![5.0, 1.0]),
        ];

        let fronts = fast_non_dominated_sort(&mut candidates, &directions);
        crowding_distance(&mut candidates, &fronts[0]);

        // Extremes of the front are kept at infinite distance
        let infinite = candidates
            .iter()
            .filter(|c| c.crowding_distance.is_infinite())
            .count();
        assert_eq!(infinite, 2);
        assert!(candidates[1].crowding_distance.is_finite());
    }

    // Chromosome-level tests below use a finder that renames targets once
    // per gene, so gene counts map directly onto distinguishable phenotypes.

    struct GrowFinder;

    struct GrowRefactoring {
        step: usize,
    }

    impl Refactoring for GrowRefactoring {
        fn kind(&self) -> &'static str {
            "grow"
        }

        fn signature(&self) -> String {
            format!("{}({})", self.kind(), self.step)
        }

        fn apply(&self, program: &Program) -> Program {
            let mut result = program.clone();
            result.targets.push(Target {
                name: format!("clone {}", self.step),
                scripts: Vec::new(),
                procedures: Vec::new(),
            });
            result
        }
    }

    impl RefactoringFinder for GrowFinder {
        fn name(&self) -> &'static str {
            "grow"
        }

        fn find_all(&self, program: &Program) -> Vec<Box<dyn Refactoring>> {
            // At most four applications
            if program.targets.len() >= 5 {
                return Vec::new();
            }
            vec![Box::new(GrowRefactoring {
                step: program.targets.len(),
            })]
        }
    }

    fn grown(steps: usize) -> RefactorSequence {
        let program = Arc::new(Program::new(
            "sample",
            vec![Target {
                name: "sprite".to_string(),
                scripts: Vec::new(),
                procedures: Vec::new(),
            }],
        ));
        let finders: Arc<Vec<Arc<dyn RefactoringFinder>>> =
            Arc::new(vec![Arc::new(GrowFinder)]);
        RefactorSequence::new(vec![0; steps], program, finders).unwrap()
    }

    struct TargetCount {
        minimizing: bool,
        negate: bool,
    }

    impl FitnessFunction for TargetCount {
        fn name(&self) -> &'static str {
            if self.negate {
                "negated_target_count"
            } else {
                "target_count"
            }
        }

        fn is_minimizing(&self) -> bool {
            self.minimizing
        }

        fn evaluate(&self, sequence: &RefactorSequence) -> f64 {
            let count = sequence.refactored_program().targets.len() as f64;
            if self.negate {
                -count
            } else {
                count
            }
        }
    }

    fn minimize_targets() -> Vec<Arc<dyn FitnessFunction>> {
        vec![Arc::new(TargetCount {
            minimizing: true,
            negate: false,
        })]
    }

    #[test]
    fn test_dominates_irreflexive() {
        let a = grown(2);
        assert!(!dominates(&a, &a, &minimize_targets()));
    }

    #[test]
    fn test_dominates_asymmetric() {
        let a = grown(1);
        let b = grown(3);
        let objectives = minimize_targets();

        assert!(dominates(&a, &b, &objectives));
        assert!(!dominates(&b, &a, &objectives));
    }

    #[test]
    fn test_direction_symmetry() {
        // Minimizing f and maximizing -f must produce identical verdicts
        let minimized = minimize_targets();
        let negated: Vec<Arc<dyn FitnessFunction>> = vec![Arc::new(TargetCount {
            minimizing: false,
            negate: true,
        })];

        for (left, right) in [(0usize, 2usize), (2, 0), (1, 1), (3, 2)] {
            let a = grown(left);
            let b = grown(right);
            assert_eq!(
                dominates(&a, &b, &minimized),
                dominates(&a, &b, &negated),
                "verdict differs for sizes {} vs {}",
                left,
                right
            );
        }
    }
}
