//! Model-based property tests for the diagnostic log invariants.

use proptest::prelude::*;
use sourcecheck_core::{Code, DiagnosticLog, Scope, Severity};

const CODES: &[Code] = &["alpha", "beta", "gamma"];

#[derive(Debug, Clone)]
enum Op {
    Add {
        scope: usize,
        code: usize,
        error: bool,
        persistent: bool,
    },
    RemoveError {
        code: usize,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 0..CODES.len(), any::<bool>(), any::<bool>()).prop_map(
            |(scope, code, error, persistent)| Op::Add {
                scope,
                code,
                error,
                persistent,
            }
        ),
        (0..CODES.len()).prop_map(|code| Op::RemoveError { code }),
    ]
}

fn scope_for(workspace_scopes: &[Scope], index: usize) -> Scope {
    workspace_scopes[index % workspace_scopes.len()]
}

proptest! {
    #[test]
    fn log_matches_reference_model(ops in proptest::collection::vec(op_strategy(), 0..60)) {
        // Three file scopes plus the workspace scope.
        let mut ws = sourcecheck_core::Workspace::new(Box::new(sourcecheck_core::MemoryStorage::new()));
        let mut scopes = Vec::new();
        for name in ["a.tex", "b.tex", "c.tex"] {
            let key = ws.create(name, sourcecheck_core::FileType::Tex, b"x").unwrap();
            scopes.push(Scope::File(key));
        }
        scopes.push(Scope::Workspace);

        let mut log = DiagnosticLog::new();
        // Model: the set of active diagnostics.
        let mut model: Vec<(Scope, Code, Severity, bool)> = Vec::new();
        let mut total_entries = 0usize;

        for op in ops {
            match op {
                Op::Add { scope, code, error, persistent } => {
                    let scope = scope_for(&scopes, scope);
                    let code = CODES[code];
                    let severity = if error { Severity::Error } else { Severity::Warning };
                    let added = log.add(scope, None, severity, code, "msg", persistent);
                    let in_model = model
                        .iter()
                        .any(|(s, c, sev, _)| *s == scope && *c == code && *sev == severity);
                    prop_assert_eq!(added, !in_model, "add must dedupe against active entries");
                    if added {
                        model.push((scope, code, severity, persistent));
                        total_entries += 1;
                    }
                }
                Op::RemoveError { code } => {
                    let code = CODES[code];
                    let retracted = log.remove_error(code);
                    let expected = model
                        .iter()
                        .filter(|(_, c, sev, _)| *c == code && *sev == Severity::Error)
                        .count();
                    prop_assert_eq!(retracted, expected);
                    model.retain(|(_, c, sev, _)| !(*c == code && *sev == Severity::Error));
                }
            }

            // Invariants hold after every operation.
            prop_assert_eq!(log.active().count(), model.len());
            prop_assert_eq!(log.iter().count(), total_entries);
            let model_has_errors = model
                .iter()
                .any(|(_, _, sev, persistent)| *sev == Severity::Error && *persistent);
            prop_assert_eq!(log.has_errors(), model_has_errors);
        }

        // Retraction never deletes: the full log holds every accepted add.
        prop_assert_eq!(log.iter().count(), total_entries);
    }
}
