pub mod conjunction_to_nested_ifs;
pub mod extract_key_handlers;
pub mod split_script_after_loop;

pub use conjunction_to_nested_ifs::ConjunctionToNestedIfsFinder;
pub use extract_key_handlers::ExtractKeyHandlersFinder;
pub use split_script_after_loop::SplitScriptAfterLoopFinder;

use crate::program::Program;
use std::sync::Arc;

/// One concrete, already-located program transformation.
///
/// `apply` is pure: it never mutates its input and returns a brand-new
/// program. The signature must be stable across runs so that identical
/// genes, original program and finder list always reproduce identical
/// derivations.
pub trait Refactoring: Send + Sync {
    /// Stable kind-name shared by all refactorings a finder produces
    fn kind(&self) -> &'static str;

    /// Kind plus site coordinates; equal signatures mean the same concrete
    /// transformation
    fn signature(&self) -> String;

    fn apply(&self, program: &Program) -> Program;
}

/// Enumerates every currently-legal refactoring of one kind.
///
/// `find_all` must not mutate the program and must return its candidates in
/// a deterministic order.
pub trait RefactoringFinder: Send + Sync {
    fn name(&self) -> &'static str;

    fn find_all(&self, program: &Program) -> Vec<Box<dyn Refactoring>>;
}

/// Open catalogue of refactoring finders.
///
/// New refactoring kinds register an implementation here; the search engine
/// only ever sees the trait objects.
pub struct FinderRegistry {
    finders: Vec<Arc<dyn RefactoringFinder>>,
}

impl FinderRegistry {
    pub fn empty() -> Self {
        Self {
            finders: Vec::new(),
        }
    }

    /// Registry with all built-in finders
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(SplitScriptAfterLoopFinder));
        registry.register(Arc::new(ConjunctionToNestedIfsFinder));
        registry.register(Arc::new(ExtractKeyHandlersFinder));
        registry
    }

    pub fn register(&mut self, finder: Arc<dyn RefactoringFinder>) {
        self.finders.push(finder);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RefactoringFinder>> {
        self.finders.iter().find(|f| f.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.finders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finders.is_empty()
    }

    /// Shared, ordered finder list handed to every chromosome of a run
    pub fn shared_finders(&self) -> Arc<Vec<Arc<dyn RefactoringFinder>>> {
        Arc::new(self.finders.clone())
    }
}

impl Default for FinderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
