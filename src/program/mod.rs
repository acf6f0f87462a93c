pub mod ast;
pub mod metrics;

pub use ast::{Event, Expr, Procedure, Program, Script, Stmt, Target};
