//! Derivation behaviour against the real finder catalogue.

use litterbox::program::{Event, Expr, Program, Script, Stmt, Target};
use litterbox::refactorings::{ExtractKeyHandlersFinder, FinderRegistry, RefactoringFinder};
use litterbox::search::RefactorSequence;
use std::sync::Arc;

/// One key-polling script: the extract finder offers exactly one candidate
/// until it is applied, then none
fn single_pattern_program() -> Program {
    Program::new(
        "single",
        vec![Target {
            name: "sprite".to_string(),
            scripts: vec![Script {
                event: Event::GreenFlag,
                body: vec![Stmt::Forever {
                    body: vec![Stmt::If {
                        condition: Expr::KeyPressed("space".to_string()),
                        body: vec![Stmt::Say("pressed".to_string())],
                    }],
                }],
            }],
            procedures: Vec::new(),
        }],
    )
}

fn extract_only_finders() -> Arc<Vec<Arc<dyn RefactoringFinder>>> {
    Arc::new(vec![
        Arc::new(ExtractKeyHandlersFinder) as Arc<dyn RefactoringFinder>
    ])
}

#[test]
fn test_disappearing_pattern_truncates_derivation() {
    // genes [0, 0]: the second gene finds no candidates left
    let sequence = RefactorSequence::new(
        vec![0, 0],
        Arc::new(single_pattern_program()),
        extract_only_finders(),
    )
    .unwrap();

    assert_eq!(sequence.executed_refactorings().len(), 1);
    assert_eq!(
        sequence.executed_refactorings()[0].kind(),
        "extract_key_handlers"
    );
}

#[test]
fn test_gene_value_irrelevant_for_single_candidate() {
    // With one legal candidate, every gene value selects it
    let program = Arc::new(single_pattern_program());
    let a = RefactorSequence::new(vec![0], Arc::clone(&program), extract_only_finders()).unwrap();
    let b = RefactorSequence::new(vec![999], Arc::clone(&program), extract_only_finders()).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.refactored_program(), b.refactored_program());
}

#[test]
fn test_full_catalogue_chains_refactorings() {
    let program = Program::new(
        "chained",
        vec![Target {
            name: "sprite".to_string(),
            scripts: vec![Script {
                event: Event::GreenFlag,
                body: vec![
                    Stmt::RepeatUntil {
                        condition: Expr::Variable("done".to_string()),
                        body: vec![Stmt::Move(Expr::Number(1.0))],
                    },
                    Stmt::If {
                        condition: Expr::And(
                            Box::new(Expr::Variable("a".to_string())),
                            Box::new(Expr::Variable("b".to_string())),
                        ),
                        body: vec![Stmt::Say("both".to_string())],
                    },
                ],
            }],
            procedures: Vec::new(),
        }],
    );

    let registry = FinderRegistry::new();
    let sequence = RefactorSequence::new(
        vec![0, 0, 0, 0],
        Arc::new(program),
        registry.shared_finders(),
    )
    .unwrap();

    // Both smells get addressed somewhere along the chain
    let kinds: Vec<&str> = sequence
        .executed_refactorings()
        .iter()
        .map(|r| r.kind())
        .collect();
    assert!(kinds.len() >= 2);
    assert!(kinds.contains(&"split_script_after_loop"));
}

#[test]
fn test_derivation_leaves_shared_original_untouched() {
    let original = Arc::new(single_pattern_program());
    let snapshot = (*original).clone();

    let sequences: Vec<RefactorSequence> = (0..4)
        .map(|g| {
            RefactorSequence::new(vec![g, g], Arc::clone(&original), extract_only_finders())
                .unwrap()
        })
        .collect();

    for sequence in &sequences {
        let _ = sequence.refactored_program();
    }

    assert_eq!(*original, snapshot);
}
