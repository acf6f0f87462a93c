use crate::error::{LitterboxError, Result};
use crate::program::Program;
use crate::refactorings::{Refactoring, RefactoringFinder};
use crate::search::fitness::FitnessFunction;
use crate::search::genome::Genome;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

/// The decoded form of a chromosome: the refactorings that actually ran and
/// the program they produced. Owned by exactly one chromosome, never shared.
pub struct Phenotype {
    executed: Vec<Box<dyn Refactoring>>,
    refactored: Program,
}

impl Phenotype {
    pub fn executed(&self) -> &[Box<dyn Refactoring>] {
        &self.executed
    }

    pub fn refactored(&self) -> &Program {
        &self.refactored
    }

    /// Signatures of the executed refactorings, in execution order
    pub fn signatures(&self) -> Vec<String> {
        self.executed.iter().map(|r| r.signature()).collect()
    }
}

/// One candidate solution: a gene sequence over a shared original program
/// and finder list, with a lazily derived, cached phenotype.
///
/// Derivation replays from a fresh copy of the original every time the genes
/// are decoded, because the candidate refactorings at each step depend on
/// the program state reached so far. The phenotype is computed at most once
/// per chromosome; evolution creates new chromosomes instead of mutating
/// genes in place.
///
/// Equality and hashing are defined over the executed-refactorings phenotype,
/// not the raw genes: two chromosomes with different genes that decode to the
/// same refactoring sequence are equal. Comparing may trigger derivation.
pub struct RefactorSequence {
    original: Arc<Program>,
    finders: Arc<Vec<Arc<dyn RefactoringFinder>>>,
    genes: Genome,
    phenotype: OnceLock<Phenotype>,
    fitness_cache: Mutex<HashMap<String, f64>>,
}

impl RefactorSequence {
    pub fn new(
        genes: Genome,
        original: Arc<Program>,
        finders: Arc<Vec<Arc<dyn RefactoringFinder>>>,
    ) -> Result<Self> {
        if finders.is_empty() {
            return Err(LitterboxError::Configuration(
                "Refactor sequence needs at least one finder".to_string(),
            ));
        }
        Ok(Self {
            original,
            finders,
            genes,
            phenotype: OnceLock::new(),
            fitness_cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn genes(&self) -> &[u32] {
        &self.genes
    }

    pub fn original(&self) -> &Program {
        &self.original
    }

    /// The decoded phenotype, derived on first access and cached.
    ///
    /// `OnceLock` guarantees the expensive replay runs exactly once even
    /// when several evaluators race on the first access.
    pub fn phenotype(&self) -> &Phenotype {
        self.phenotype.get_or_init(|| self.derive())
    }

    /// Refactorings that actually ran; possibly shorter than `genes()` when
    /// derivation truncated on an empty candidate list
    pub fn executed_refactorings(&self) -> &[Box<dyn Refactoring>] {
        self.phenotype().executed()
    }

    /// The refactored program, computed on first access and cached
    pub fn refactored_program(&self) -> &Program {
        self.phenotype().refactored()
    }

    /// Replays the genes against a fresh copy of the original.
    ///
    /// At each step all finders are queried in list order against the
    /// current program and their candidates concatenated; the gene selects
    /// one by index modulo the candidate count. An empty candidate list
    /// stops derivation early, leaving the remaining genes unused.
    fn derive(&self) -> Phenotype {
        let mut current = (*self.original).clone();
        let mut executed: Vec<Box<dyn Refactoring>> = Vec::new();

        for &gene in &self.genes {
            let mut candidates: Vec<Box<dyn Refactoring>> = Vec::new();
            for finder in self.finders.iter() {
                candidates.extend(finder.find_all(&current));
            }

            if candidates.is_empty() {
                break;
            }

            let chosen = candidates.swap_remove(gene as usize % candidates.len());
            current = chosen.apply(&current);
            executed.push(chosen);
        }

        // `current` is moved in, so the cached program is independent of
        // anything outside this phenotype
        Phenotype {
            executed,
            refactored: current,
        }
    }

    /// Memoized fitness value: each function is evaluated at most once per
    /// chromosome, never re-evaluated per dominance comparison
    pub fn fitness_of(&self, function: &dyn FitnessFunction) -> f64 {
        if let Some(&value) = self.fitness_cache.lock().unwrap().get(function.name()) {
            return value;
        }

        // Evaluate outside the lock: evaluation may trigger derivation
        let value = function.evaluate(self);
        self.fitness_cache
            .lock()
            .unwrap()
            .entry(function.name().to_string())
            .or_insert(value);
        value
    }
}

impl PartialEq for RefactorSequence {
    fn eq(&self, other: &Self) -> bool {
        self.phenotype().signatures() == other.phenotype().signatures()
    }
}

impl Eq for RefactorSequence {}

impl Hash for RefactorSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for signature in self.phenotype().signatures() {
            signature.hash(state);
        }
    }
}

impl fmt::Debug for RefactorSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefactorSequence")
            .field("genes", &self.genes)
            .field("derived", &self.phenotype.get().is_some())
            .finish()
    }
}
