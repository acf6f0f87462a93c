use crate::config::SearchConfig;
use crate::error::{LitterboxError, Result};
use crate::program::Program;
use crate::refactorings::RefactoringFinder;
use crate::search::archive::{EliteRefactoring, RefactoringArchive};
use crate::search::chromosome::RefactorSequence;
use crate::search::dominance::{
    self, OptimizationDirection, RankedCandidate,
};
use crate::search::fitness::FitnessFunction;
use crate::search::genome::Genome;
use crate::search::operators::{crossover, mutate, pareto_tournament_selection, random_genome};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Arc;

/// Hooks for observing a running search
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, front_size: usize, archive_size: usize);
    fn on_candidate_evaluated(&mut self, candidate_num: usize, total: usize);
}

/// NSGA-II style evolutionary search over refactor sequences.
///
/// Each generation wraps the genome population into fresh chromosomes,
/// evaluates every objective in parallel, ranks the population by Pareto
/// front and crowding distance, archives the candidates, and breeds the next
/// generation through elitism, Pareto tournaments, crossover and mutation.
/// Chromosomes are never mutated in place; offspring are new chromosomes
/// built from new gene sequences.
pub struct SearchEngine {
    config: SearchConfig,
    original: Arc<Program>,
    finders: Arc<Vec<Arc<dyn RefactoringFinder>>>,
    objectives: Vec<Arc<dyn FitnessFunction>>,
    directions: Vec<OptimizationDirection>,
    archive: RefactoringArchive,
    rng: StdRng,
}

impl SearchEngine {
    /// Fails fast when the finder list or objective list is empty, or the
    /// configuration is invalid; a search missing its collaborators must not
    /// get as far as a first derivation.
    pub fn new(
        config: SearchConfig,
        original: Program,
        finders: Arc<Vec<Arc<dyn RefactoringFinder>>>,
        objectives: Vec<Arc<dyn FitnessFunction>>,
    ) -> Result<Self> {
        config.validate()?;
        if finders.is_empty() {
            return Err(LitterboxError::Configuration(
                "Search needs at least one refactoring finder".to_string(),
            ));
        }
        if objectives.is_empty() {
            return Err(LitterboxError::Configuration(
                "Search needs at least one fitness function".to_string(),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let directions: Vec<OptimizationDirection> = objectives
            .iter()
            .map(|o| {
                if o.is_minimizing() {
                    OptimizationDirection::Minimize
                } else {
                    OptimizationDirection::Maximize
                }
            })
            .collect();

        let archive = RefactoringArchive::new(config.archive_size, directions.clone());

        Ok(Self {
            config,
            original: Arc::new(original),
            finders,
            objectives,
            directions,
            archive,
            rng,
        })
    }

    /// Run the search and return the archived Pareto-best refactorings
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<Vec<EliteRefactoring>> {
        info!(
            "Starting refactoring search: {} generations, population {}",
            self.config.generations, self.config.population_size
        );

        let mut population = self.initialize_population();

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            let (candidates, sequences) = self.evaluate_population(&population, &mut callback)?;

            for (candidate, sequence) in candidates.iter().zip(&sequences) {
                self.archive.try_add(EliteRefactoring {
                    genes: population[candidate.data].clone(),
                    refactoring_signatures: sequence.phenotype().signatures(),
                    program: sequence.refactored_program().clone(),
                    objectives: candidate.objectives.clone(),
                    pareto_rank: candidate.rank,
                    crowding_distance: candidate.crowding_distance,
                });
            }

            let front_size = candidates.iter().filter(|c| c.rank == 0).count();
            info!(
                "Generation {}: first front {} of {}, archive {}",
                generation + 1,
                front_size,
                candidates.len(),
                self.archive.len()
            );
            callback.on_generation_complete(generation, front_size, self.archive.len());

            if generation == self.config.generations - 1 {
                break;
            }

            population = self.create_next_generation(&candidates, &population);
        }

        Ok(self.archive.get_all().to_vec())
    }

    pub fn archive(&self) -> &RefactoringArchive {
        &self.archive
    }

    fn initialize_population(&mut self) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| {
                random_genome(
                    self.config.genome_length,
                    self.config.gene_range(),
                    &mut self.rng,
                )
            })
            .collect()
    }

    /// Wrap every genome into a chromosome, evaluate all objectives in
    /// parallel, and rank the generation by Pareto front and crowding
    /// distance. Parallelism is safe because chromosomes share nothing
    /// mutable: the original program and finder list are read-only, and each
    /// chromosome owns its lazy phenotype cache.
    fn evaluate_population<C: ProgressCallback>(
        &self,
        population: &[Genome],
        callback: &mut C,
    ) -> Result<(Vec<RankedCandidate<usize>>, Vec<RefactorSequence>)> {
        let sequences: Vec<RefactorSequence> = population
            .iter()
            .map(|genes| {
                RefactorSequence::new(
                    genes.clone(),
                    Arc::clone(&self.original),
                    Arc::clone(&self.finders),
                )
            })
            .collect::<Result<_>>()?;

        let objective_values: Vec<Vec<f64>> = sequences
            .par_iter()
            .map(|sequence| {
                self.objectives
                    .iter()
                    .map(|objective| sequence.fitness_of(objective.as_ref()))
                    .collect()
            })
            .collect();

        for (i, sequence) in sequences.iter().enumerate() {
            debug!(
                "  [{}] executed {} of {} genes",
                i + 1,
                sequence.executed_refactorings().len(),
                sequence.genes().len()
            );
            callback.on_candidate_evaluated(i + 1, sequences.len());
        }

        let mut candidates: Vec<RankedCandidate<usize>> = objective_values
            .into_iter()
            .enumerate()
            .map(|(i, values)| RankedCandidate::new(i, values))
            .collect();

        let fronts = dominance::fast_non_dominated_sort(&mut candidates, &self.directions);
        for front in &fronts {
            dominance::crowding_distance(&mut candidates, front);
        }

        Ok((candidates, sequences))
    }

    fn create_next_generation(
        &mut self,
        candidates: &[RankedCandidate<usize>],
        population: &[Genome],
    ) -> Vec<Genome> {
        let ranked: Vec<(Genome, usize, f64)> = candidates
            .iter()
            .map(|c| {
                (
                    population[c.data].clone(),
                    c.rank,
                    c.crowding_distance,
                )
            })
            .collect();

        let mut next_generation = Vec::with_capacity(self.config.population_size);

        // Elitism: carry the best genomes over unchanged
        let elite_count =
            (self.config.population_size as f64 * self.config.elitism_rate) as usize;
        let mut sorted = ranked.clone();
        sorted.sort_by(|a, b| match a.1.cmp(&b.1) {
            std::cmp::Ordering::Equal => b
                .2
                .partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal),
            other => other,
        });
        for (genome, _, _) in sorted.iter().take(elite_count) {
            next_generation.push(genome.clone());
        }

        while next_generation.len() < self.config.population_size {
            if self.rng.gen::<f64>() < self.config.crossover_rate {
                let parent1 = pareto_tournament_selection(
                    &ranked,
                    self.config.tournament_size,
                    &mut self.rng,
                );
                let parent2 = pareto_tournament_selection(
                    &ranked,
                    self.config.tournament_size,
                    &mut self.rng,
                );

                let (mut child1, mut child2) = crossover(&parent1, &parent2, &mut self.rng);
                mutate(
                    &mut child1,
                    self.config.mutation_rate,
                    self.config.gene_range(),
                    &mut self.rng,
                );
                mutate(
                    &mut child2,
                    self.config.mutation_rate,
                    self.config.gene_range(),
                    &mut self.rng,
                );

                next_generation.push(child1);
                if next_generation.len() < self.config.population_size {
                    next_generation.push(child2);
                }
            } else {
                let mut child = pareto_tournament_selection(
                    &ranked,
                    self.config.tournament_size,
                    &mut self.rng,
                );
                mutate(
                    &mut child,
                    self.config.mutation_rate,
                    self.config.gene_range(),
                    &mut self.rng,
                );
                next_generation.push(child);
            }
        }

        next_generation.truncate(self.config.population_size);
        next_generation
    }
}
