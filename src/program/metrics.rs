// src/program/metrics.rs
use super::ast::{Program, Stmt};
use std::collections::HashMap;

/// Nesting-weighted difficulty of one statement sequence.
///
/// Every statement costs 1 plus half its nesting depth; conditions and other
/// embedded expressions add a quarter point per expression node. Deeply
/// nested scripts therefore score worse than flat ones with the same blocks,
/// which is what the split/extract refactorings are meant to improve.
pub fn body_difficulty(body: &[Stmt]) -> f64 {
    difficulty_at(body, 0)
}

fn difficulty_at(body: &[Stmt], depth: usize) -> f64 {
    let mut total = 0.0;
    for stmt in body {
        total += 1.0 + 0.5 * depth as f64;
        total += 0.25 * expr_nodes(stmt) as f64;
        for child in stmt.child_bodies() {
            total += difficulty_at(child, depth + 1);
        }
    }
    total
}

fn expr_nodes(stmt: &Stmt) -> usize {
    match stmt {
        Stmt::Move(e) | Stmt::Wait(e) => e.node_count(),
        Stmt::SetVariable { value, .. } => value.node_count(),
        Stmt::ChangeVariable { delta, .. } => delta.node_count(),
        Stmt::If { condition, .. }
        | Stmt::IfElse { condition, .. }
        | Stmt::RepeatUntil { condition, .. } => condition.node_count(),
        Stmt::Repeat { times, .. } => times.node_count(),
        Stmt::Say(_) | Stmt::Broadcast(_) | Stmt::Forever { .. } => 0,
    }
}

/// Shannon entropy of the statement-kind distribution of one sequence,
/// including nested statements. Empty bodies have zero entropy.
pub fn body_entropy(body: &[Stmt]) -> f64 {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    collect_kinds(body, &mut counts);

    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let n = total as f64;
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum()
}

fn collect_kinds(body: &[Stmt], counts: &mut HashMap<&'static str, usize>) {
    for stmt in body {
        *counts.entry(stmt.kind_tag()).or_insert(0) += 1;
        for child in stmt.child_bodies() {
            collect_kinds(child, counts);
        }
    }
}

/// Total difficulty over every script and procedure of a program
pub fn program_difficulty(program: &Program) -> f64 {
    program.bodies().map(body_difficulty).sum()
}
