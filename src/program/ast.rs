use serde::{Deserialize, Serialize};

/// Hat block that triggers a script
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    GreenFlag,
    KeyPressed(String),
    MessageReceived(String),
}

/// Expression blocks (reporters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(f64),
    Variable(String),
    KeyPressed(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    GreaterThan(Box<Expr>, Box<Expr>),
    LessThan(Box<Expr>, Box<Expr>),
    Equals(Box<Expr>, Box<Expr>),
}

/// Statement blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Move(Expr),
    Say(String),
    SetVariable { name: String, value: Expr },
    ChangeVariable { name: String, delta: Expr },
    Broadcast(String),
    Wait(Expr),
    If { condition: Expr, body: Vec<Stmt> },
    IfElse { condition: Expr, then_body: Vec<Stmt>, else_body: Vec<Stmt> },
    Repeat { times: Expr, body: Vec<Stmt> },
    RepeatUntil { condition: Expr, body: Vec<Stmt> },
    Forever { body: Vec<Stmt> },
}

/// One script: an event hat plus a statement sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub event: Event,
    pub body: Vec<Stmt>,
}

/// A custom-block definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub body: Vec<Stmt>,
}

/// One actor (stage or sprite) owning scripts and procedures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub scripts: Vec<Script>,
    pub procedures: Vec<Procedure>,
}

/// A whole parsed project.
///
/// The engine treats this as an opaque immutable value: refactorings take a
/// `&Program` and return a new one, and `Clone` provides the exact,
/// independent deep copy that replay-from-scratch derivation relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub targets: Vec<Target>,
}

impl Program {
    pub fn new(name: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            name: name.into(),
            targets,
        }
    }

    /// Number of scripts plus procedures across all targets
    pub fn script_count(&self) -> usize {
        self.targets
            .iter()
            .map(|t| t.scripts.len() + t.procedures.len())
            .sum()
    }

    /// All statement sequences (script and procedure bodies) in target order
    pub fn bodies(&self) -> impl Iterator<Item = &[Stmt]> {
        self.targets.iter().flat_map(|t| {
            t.scripts
                .iter()
                .map(|s| s.body.as_slice())
                .chain(t.procedures.iter().map(|p| p.body.as_slice()))
        })
    }

    /// Canonical JSON form, used for structural deduplication
    pub fn canonical_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Stmt {
    /// Stable tag naming the block kind, used by the entropy metric
    pub fn kind_tag(&self) -> &'static str {
        match self {
            Stmt::Move(_) => "move",
            Stmt::Say(_) => "say",
            Stmt::SetVariable { .. } => "set_variable",
            Stmt::ChangeVariable { .. } => "change_variable",
            Stmt::Broadcast(_) => "broadcast",
            Stmt::Wait(_) => "wait",
            Stmt::If { .. } => "if",
            Stmt::IfElse { .. } => "if_else",
            Stmt::Repeat { .. } => "repeat",
            Stmt::RepeatUntil { .. } => "repeat_until",
            Stmt::Forever { .. } => "forever",
        }
    }

    /// Nested statement sequences, empty for plain blocks
    pub fn child_bodies(&self) -> Vec<&[Stmt]> {
        match self {
            Stmt::If { body, .. }
            | Stmt::Repeat { body, .. }
            | Stmt::RepeatUntil { body, .. }
            | Stmt::Forever { body } => vec![body.as_slice()],
            Stmt::IfElse {
                then_body,
                else_body,
                ..
            } => vec![then_body.as_slice(), else_body.as_slice()],
            _ => Vec::new(),
        }
    }
}

impl Expr {
    /// Number of expression nodes, counting this one
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable(_) | Expr::KeyPressed(_) => 1,
            Expr::Not(inner) => 1 + inner.node_count(),
            Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::GreaterThan(a, b)
            | Expr::LessThan(a, b)
            | Expr::Equals(a, b) => 1 + a.node_count() + b.node_count(),
        }
    }
}
