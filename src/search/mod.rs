pub mod archive;
pub mod chromosome;
pub mod dominance;
pub mod engine;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod progress;

pub use archive::{EliteRefactoring, RefactoringArchive};
pub use chromosome::{Phenotype, RefactorSequence};
pub use dominance::{dominates, dominates_values, OptimizationDirection, RankedCandidate};
pub use engine::{ProgressCallback, SearchEngine};
pub use fitness::{
    AverageScriptDifficulty, FitnessFunction, RelativeDifficultyImprovement, ScriptCount,
    TotalScriptEntropy,
};
pub use genome::Genome;
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
