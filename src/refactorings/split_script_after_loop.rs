use super::{Refactoring, RefactoringFinder};
use crate::program::{Event, Program, Script, Stmt};

/// Finds scripts where a `repeat until` loop is followed by more statements.
///
/// Such scripts mix two concerns: the loop and whatever happens after it.
/// The split moves the tail into its own script, connected through a
/// broadcast, which shortens the original script and makes the follow-up
/// logic independently readable.
pub struct SplitScriptAfterLoopFinder;

impl RefactoringFinder for SplitScriptAfterLoopFinder {
    fn name(&self) -> &'static str {
        "split_script_after_loop"
    }

    fn find_all(&self, program: &Program) -> Vec<Box<dyn Refactoring>> {
        let mut found: Vec<Box<dyn Refactoring>> = Vec::new();

        for (target_index, target) in program.targets.iter().enumerate() {
            for (script_index, script) in target.scripts.iter().enumerate() {
                for (loop_index, stmt) in script.body.iter().enumerate() {
                    if !matches!(stmt, Stmt::RepeatUntil { .. }) {
                        continue;
                    }
                    let tail = &script.body[loop_index + 1..];
                    // Splitting off a pure broadcast tail would just chain
                    // messages without shortening anything
                    if tail.iter().any(|s| !matches!(s, Stmt::Broadcast(_))) {
                        found.push(Box::new(SplitScriptAfterLoop {
                            target_index,
                            script_index,
                            loop_index,
                        }));
                    }
                }
            }
        }

        found
    }
}

pub struct SplitScriptAfterLoop {
    target_index: usize,
    script_index: usize,
    loop_index: usize,
}

impl Refactoring for SplitScriptAfterLoop {
    fn kind(&self) -> &'static str {
        "split_script_after_loop"
    }

    fn signature(&self) -> String {
        format!(
            "{}({},{},{})",
            self.kind(),
            self.target_index,
            self.script_index,
            self.loop_index
        )
    }

    fn apply(&self, program: &Program) -> Program {
        let mut result = program.clone();
        let target = &mut result.targets[self.target_index];
        let script = &mut target.scripts[self.script_index];

        let message = format!(
            "after loop {}-{}-{}",
            self.target_index, self.script_index, self.loop_index
        );

        let tail = script.body.split_off(self.loop_index + 1);
        script.body.push(Stmt::Broadcast(message.clone()));

        target.scripts.push(Script {
            event: Event::MessageReceived(message),
            body: tail,
        });

        result
    }
}
