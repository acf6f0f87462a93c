use super::{Refactoring, RefactoringFinder};
use crate::program::{Event, Expr, Program, Script, Stmt};

/// Finds busy-wait scripts polling the keyboard inside an infinite loop.
///
/// A script whose body is a single `forever` block containing nothing but
/// `if <key pressed>` branches re-implements event handling by hand; each
/// branch becomes its own `when key pressed` script.
pub struct ExtractKeyHandlersFinder;

impl RefactoringFinder for ExtractKeyHandlersFinder {
    fn name(&self) -> &'static str {
        "extract_key_handlers"
    }

    fn find_all(&self, program: &Program) -> Vec<Box<dyn Refactoring>> {
        let mut found: Vec<Box<dyn Refactoring>> = Vec::new();

        for (target_index, target) in program.targets.iter().enumerate() {
            for (script_index, script) in target.scripts.iter().enumerate() {
                if polled_keys(script).is_some() {
                    found.push(Box::new(ExtractKeyHandlers {
                        target_index,
                        script_index,
                    }));
                }
            }
        }

        found
    }
}

/// The per-key branches when the script matches the pattern
fn polled_keys(script: &Script) -> Option<Vec<(String, Vec<Stmt>)>> {
    let loop_body = match script.body.as_slice() {
        [Stmt::Forever { body }] => body,
        _ => return None,
    };
    if loop_body.is_empty() {
        return None;
    }

    let mut handlers = Vec::with_capacity(loop_body.len());
    for stmt in loop_body {
        match stmt {
            Stmt::If {
                condition: Expr::KeyPressed(key),
                body,
            } => handlers.push((key.clone(), body.clone())),
            _ => return None,
        }
    }
    Some(handlers)
}

pub struct ExtractKeyHandlers {
    target_index: usize,
    script_index: usize,
}

impl Refactoring for ExtractKeyHandlers {
    fn kind(&self) -> &'static str {
        "extract_key_handlers"
    }

    fn signature(&self) -> String {
        format!("{}({},{})", self.kind(), self.target_index, self.script_index)
    }

    fn apply(&self, program: &Program) -> Program {
        let mut result = program.clone();
        let target = &mut result.targets[self.target_index];

        let handlers = polled_keys(&target.scripts[self.script_index])
            .unwrap_or_default();

        let replacements = handlers.into_iter().map(|(key, body)| Script {
            event: Event::KeyPressed(key),
            body,
        });

        target
            .scripts
            .splice(self.script_index..=self.script_index, replacements);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Target;

    fn polling_program() -> Program {
        let key_branch = |key: &str, text: &str| Stmt::If {
            condition: Expr::KeyPressed(key.to_string()),
            body: vec![Stmt::Say(text.to_string())],
        };
        Program::new(
            "sample",
            vec![Target {
                name: "sprite".to_string(),
                scripts: vec![Script {
                    event: Event::GreenFlag,
                    body: vec![Stmt::Forever {
                        body: vec![key_branch("up", "jump"), key_branch("down", "duck")],
                    }],
                }],
                procedures: Vec::new(),
            }],
        )
    }

    #[test]
    fn test_finds_polling_loop() {
        let found = ExtractKeyHandlersFinder.find_all(&polling_program());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].signature(), "extract_key_handlers(0,0)");
    }

    #[test]
    fn test_apply_replaces_loop_with_event_scripts() {
        let program = polling_program();
        let before = program.clone();

        let found = ExtractKeyHandlersFinder.find_all(&program);
        let result = found[0].apply(&program);

        assert_eq!(program, before);

        let scripts = &result.targets[0].scripts;
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].event, Event::KeyPressed("up".to_string()));
        assert_eq!(scripts[1].event, Event::KeyPressed("down".to_string()));
        assert_eq!(scripts[0].body, vec![Stmt::Say("jump".to_string())]);
    }

    #[test]
    fn test_pattern_gone_after_apply() {
        let program = polling_program();
        let found = ExtractKeyHandlersFinder.find_all(&program);
        let result = found[0].apply(&program);
        assert!(ExtractKeyHandlersFinder.find_all(&result).is_empty());
    }

    #[test]
    fn test_mixed_loop_body_is_not_a_site() {
        let mut program = polling_program();
        if let Some(Stmt::Forever { body }) =
            program.targets[0].scripts[0].body.first_mut()
        {
            body.push(Stmt::Move(Expr::Number(1.0)));
        }
        assert!(ExtractKeyHandlersFinder.find_all(&program).is_empty());
    }
}
