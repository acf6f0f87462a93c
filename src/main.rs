use anyhow::Result;
use litterbox::program::{Event, Expr, Program, Script, Stmt, Target};
use litterbox::refactorings::FinderRegistry;
use litterbox::search::{
    AverageScriptDifficulty, ConsoleProgressCallback, FitnessFunction,
    RelativeDifficultyImprovement, SearchEngine, TotalScriptEntropy,
};
use litterbox::SearchConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    let program = sample_program();
    let registry = FinderRegistry::new();

    let objectives: Vec<Arc<dyn FitnessFunction>> = vec![
        Arc::new(AverageScriptDifficulty),
        Arc::new(TotalScriptEntropy),
        Arc::new(RelativeDifficultyImprovement::new(&program)),
    ];

    let config = SearchConfig {
        population_size: 30,
        generations: 20,
        genome_length: 8,
        seed: Some(42),
        ..SearchConfig::default()
    };

    let mut engine = SearchEngine::new(config, program, registry.shared_finders(), objectives)?;
    let elites = engine.run(ConsoleProgressCallback)?;

    println!("Best refactoring sequences found:");
    for (i, elite) in elites.iter().take(5).enumerate() {
        println!(
            "  {}. rank {} | objectives {:?}",
            i + 1,
            elite.pareto_rank,
            elite.objectives
        );
        for signature in &elite.refactoring_signatures {
            println!("     - {}", signature);
        }
    }

    Ok(())
}

/// A small project exhibiting all three built-in smells: a loop followed by
/// trailing statements, a conjunction condition, and a key-polling forever
/// loop.
fn sample_program() -> Program {
    let game_loop = Script {
        event: Event::GreenFlag,
        body: vec![
            Stmt::SetVariable {
                name: "score".to_string(),
                value: Expr::Number(0.0),
            },
            Stmt::RepeatUntil {
                condition: Expr::GreaterThan(
                    Box::new(Expr::Variable("score".to_string())),
                    Box::new(Expr::Number(10.0)),
                ),
                body: vec![Stmt::If {
                    condition: Expr::And(
                        Box::new(Expr::Variable("alive".to_string())),
                        Box::new(Expr::Variable("visible".to_string())),
                    ),
                    body: vec![Stmt::ChangeVariable {
                        name: "score".to_string(),
                        delta: Expr::Number(1.0),
                    }],
                }],
            },
            Stmt::Say("you win".to_string()),
            Stmt::Broadcast("game over".to_string()),
        ],
    };

    let input_loop = Script {
        event: Event::GreenFlag,
        body: vec![Stmt::Forever {
            body: vec![
                Stmt::If {
                    condition: Expr::KeyPressed("left".to_string()),
                    body: vec![Stmt::Move(Expr::Number(-10.0))],
                },
                Stmt::If {
                    condition: Expr::KeyPressed("right".to_string()),
                    body: vec![Stmt::Move(Expr::Number(10.0))],
                },
            ],
        }],
    };

    Program::new(
        "demo",
        vec![Target {
            name: "player".to_string(),
            scripts: vec![game_loop, input_loop],
            procedures: Vec::new(),
        }],
    )
}
