use crate::error::{LitterboxError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables of the evolutionary refactoring search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub population_size: usize,
    pub generations: usize,
    pub genome_length: usize,
    /// Genes are drawn from `0..max_gene_value`
    pub max_gene_value: u32,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_rate: f64,
    pub tournament_size: usize,
    pub archive_size: usize,
    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 30,
            genome_length: 10,
            max_gene_value: 1000,
            mutation_rate: 0.15,
            crossover_rate: 0.85,
            elitism_rate: 0.1,
            tournament_size: 5,
            archive_size: 10,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(LitterboxError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(LitterboxError::Configuration(
                "Generation count must be positive".to_string(),
            ));
        }
        if self.genome_length == 0 {
            return Err(LitterboxError::Configuration(
                "Genome length must be positive".to_string(),
            ));
        }
        if self.max_gene_value == 0 {
            return Err(LitterboxError::Configuration(
                "Maximum gene value must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(LitterboxError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(LitterboxError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.elitism_rate) {
            return Err(LitterboxError::Configuration(
                "Elitism rate must be between 0 and 1".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(LitterboxError::Configuration(
                "Tournament size must be positive".to_string(),
            ));
        }
        if self.archive_size == 0 {
            return Err(LitterboxError::Configuration(
                "Archive size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn gene_range(&self) -> std::ops::Range<u32> {
        0..self.max_gene_value
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LitterboxError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: SearchConfig = toml::from_str(&contents)
            .map_err(|e| LitterboxError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| LitterboxError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| LitterboxError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}
