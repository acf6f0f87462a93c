use crate::program::metrics::{body_difficulty, body_entropy, program_difficulty};
use crate::program::Program;
use crate::search::chromosome::RefactorSequence;

/// One quality objective over a refactored program.
///
/// `evaluate` must be pure given the phenotype; it may trigger derivation on
/// first access. The same ordered list of fitness functions must be used to
/// compare any two chromosomes within one run.
pub trait FitnessFunction: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether lower values are better
    fn is_minimizing(&self) -> bool;

    fn evaluate(&self, sequence: &RefactorSequence) -> f64;
}

/// Mean nesting-weighted difficulty per script or procedure (minimizing)
pub struct AverageScriptDifficulty;

impl FitnessFunction for AverageScriptDifficulty {
    fn name(&self) -> &'static str {
        "average_script_difficulty"
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn evaluate(&self, sequence: &RefactorSequence) -> f64 {
        let program = sequence.refactored_program();
        let count = program.script_count();
        if count == 0 {
            return 0.0;
        }
        program.bodies().map(body_difficulty).sum::<f64>() / count as f64
    }
}

/// Summed statement-kind entropy over all scripts and procedures (minimizing)
pub struct TotalScriptEntropy;

impl FitnessFunction for TotalScriptEntropy {
    fn name(&self) -> &'static str {
        "total_script_entropy"
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn evaluate(&self, sequence: &RefactorSequence) -> f64 {
        sequence
            .refactored_program()
            .bodies()
            .map(body_entropy)
            .sum()
    }
}

/// Number of scripts plus procedures (minimizing)
pub struct ScriptCount;

impl FitnessFunction for ScriptCount {
    fn name(&self) -> &'static str {
        "script_count"
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn evaluate(&self, sequence: &RefactorSequence) -> f64 {
        sequence.refactored_program().script_count() as f64
    }
}

/// Difficulty reduction relative to the unrefactored program (maximizing).
///
/// Constructed with the original so the score is normalized: 0 means no
/// change, positive means the refactored program is simpler overall.
pub struct RelativeDifficultyImprovement {
    original_difficulty: f64,
}

impl RelativeDifficultyImprovement {
    pub fn new(original: &Program) -> Self {
        Self {
            original_difficulty: program_difficulty(original),
        }
    }
}

impl FitnessFunction for RelativeDifficultyImprovement {
    fn name(&self) -> &'static str {
        "relative_difficulty_improvement"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, sequence: &RefactorSequence) -> f64 {
        if self.original_difficulty <= f64::EPSILON {
            return 0.0;
        }
        let refactored = program_difficulty(sequence.refactored_program());
        (self.original_difficulty - refactored) / self.original_difficulty
    }
}
