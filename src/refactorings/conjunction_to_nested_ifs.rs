use super::{Refactoring, RefactoringFinder};
use crate::program::{Expr, Program, Stmt};

/// Finds `if` blocks whose condition is a top-level conjunction.
///
/// `if a && b { .. }` becomes `if a { if b { .. } }`, which reads closer to
/// how beginners trace the control flow and exposes each operand as its own
/// decision point. Sites are addressed by their pre-order occurrence index
/// over the whole program, which stays deterministic across runs.
pub struct ConjunctionToNestedIfsFinder;

impl RefactoringFinder for ConjunctionToNestedIfsFinder {
    fn name(&self) -> &'static str {
        "conjunction_to_nested_ifs"
    }

    fn find_all(&self, program: &Program) -> Vec<Box<dyn Refactoring>> {
        let mut count = 0usize;
        for body in program.bodies() {
            count_sites(body, &mut count);
        }

        (0..count)
            .map(|occurrence| {
                Box::new(ConjunctionToNestedIfs { occurrence }) as Box<dyn Refactoring>
            })
            .collect()
    }
}

fn is_site(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::If {
            condition: Expr::And(_, _),
            ..
        }
    )
}

fn count_sites(body: &[Stmt], count: &mut usize) {
    for stmt in body {
        if is_site(stmt) {
            *count += 1;
        }
        for child in stmt.child_bodies() {
            count_sites(child, count);
        }
    }
}

pub struct ConjunctionToNestedIfs {
    occurrence: usize,
}

impl Refactoring for ConjunctionToNestedIfs {
    fn kind(&self) -> &'static str {
        "conjunction_to_nested_ifs"
    }

    fn signature(&self) -> String {
        format!("{}({})", self.kind(), self.occurrence)
    }

    fn apply(&self, program: &Program) -> Program {
        let mut result = program.clone();
        let mut next = 0usize;

        for target in &mut result.targets {
            for script in &mut target.scripts {
                script.body = rewrite_body(&script.body, &mut next, self.occurrence);
            }
            for procedure in &mut target.procedures {
                procedure.body = rewrite_body(&procedure.body, &mut next, self.occurrence);
            }
        }

        result
    }
}

/// Rebuilds a statement sequence, unfolding the conjunction at the `site`-th
/// pre-order occurrence. Traversal order must match `count_sites` exactly.
fn rewrite_body(body: &[Stmt], next: &mut usize, site: usize) -> Vec<Stmt> {
    body.iter()
        .map(|stmt| rewrite_stmt(stmt, next, site))
        .collect()
}

fn rewrite_stmt(stmt: &Stmt, next: &mut usize, site: usize) -> Stmt {
    if is_site(stmt) {
        let here = *next;
        *next += 1;
        if here == site {
            if let Stmt::If {
                condition: Expr::And(left, right),
                body,
            } = stmt
            {
                return Stmt::If {
                    condition: (**left).clone(),
                    body: vec![Stmt::If {
                        condition: (**right).clone(),
                        body: rewrite_body(body, next, site),
                    }],
                };
            }
        }
    }

    match stmt {
        Stmt::If { condition, body } => Stmt::If {
            condition: condition.clone(),
            body: rewrite_body(body, next, site),
        },
        Stmt::IfElse {
            condition,
            then_body,
            else_body,
        } => Stmt::IfElse {
            condition: condition.clone(),
            then_body: rewrite_body(then_body, next, site),
            else_body: rewrite_body(else_body, next, site),
        },
        Stmt::Repeat { times, body } => Stmt::Repeat {
            times: times.clone(),
            body: rewrite_body(body, next, site),
        },
        Stmt::RepeatUntil { condition, body } => Stmt::RepeatUntil {
            condition: condition.clone(),
            body: rewrite_body(body, next, site),
        },
        Stmt::Forever { body } => Stmt::Forever {
            body: rewrite_body(body, next, site),
        },
        other => other.clone(),
    }
}
