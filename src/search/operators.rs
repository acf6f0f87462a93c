use crate::search::genome::Genome;
use rand::Rng;

/// Generate a random genome
pub fn random_genome<R: Rng>(
    length: usize,
    gene_range: std::ops::Range<u32>,
    rng: &mut R,
) -> Genome {
    (0..length)
        .map(|_| rng.gen_range(gene_range.clone()))
        .collect()
}

/// Single-point crossover: swap genome tails
pub fn crossover<R: Rng>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> (Genome, Genome) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1[point..len].copy_from_slice(&parent2[point..len]);
    child2[point..len].copy_from_slice(&parent1[point..len]);

    (child1, child2)
}

/// Mutation: re-roll each gene with probability `mutation_rate`
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    mutation_rate: f64,
    gene_range: std::ops::Range<u32>,
    rng: &mut R,
) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = rng.gen_range(gene_range.clone());
        }
    }
}

/// Tournament selection over Pareto-ranked genomes: pick the best of K
/// random candidates, preferring lower rank, then higher crowding distance
pub fn pareto_tournament_selection<R: Rng>(
    population: &[(Genome, usize, f64)],
    tournament_size: usize,
    rng: &mut R,
) -> Genome {
    let mut best_idx = rng.gen_range(0..population.len());

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        let (_, rank, crowding) = &population[idx];
        let (_, best_rank, best_crowding) = &population[best_idx];

        if rank < best_rank || (rank == best_rank && crowding > best_crowding) {
            best_idx = idx;
        }
    }

    population[best_idx].0.clone()
}
