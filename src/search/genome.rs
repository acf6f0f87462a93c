/// Genotype of one refactor sequence
///
/// A genome is a fixed-length sequence of non-negative integers. Each gene
/// picks one entry out of the refactoring candidates that are legal at that
/// step, by taking the gene value modulo the candidate count.
///
/// # Why a flat integer sequence instead of a refactoring list?
///
/// Which refactorings are legal depends on the program state reached so far:
/// applying one transformation changes what the finders offer next. A list
/// of concrete refactorings would go stale after the first crossover. Genes
/// stay valid under any mutation or crossover because they are only resolved
/// against the current candidate list during derivation:
/// - **Crossover**: swapping genome segments is plain array slicing
/// - **Mutation**: changing one gene is a single integer write
/// - **No invalid states**: any genome decodes to some legal sequence,
///   possibly a truncated one
///
/// The flip side is that structurally different genomes frequently decode to
/// the same phenotype, and nudging a gene by a fixed amount does not nudge
/// the phenotype by a comparable amount.
pub type Genome = Vec<u32>;
