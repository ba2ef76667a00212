use crate::error::{AppError, AppResult};
use crate::patcher::anchor::AnchorSpec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One textual insertion: where (`anchor`) and what (`text`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchStep {
    /// Short label for logs.
    #[serde(default)]
    pub name: String,
    /// Insertion point.
    pub anchor: AnchorSpec,
    /// Text inserted at the resolved offset.
    pub text: String,
}

/// Inserts `text` at byte `offset` of `source`.
pub fn insert_at(source: &str, offset: usize, text: &str) -> AppResult<String> {
    if !source.is_char_boundary(offset) {
        return Err(AppError::General(format!(
            "Offset {} is not a valid insertion point (document length {})",
            offset,
            source.len()
        )));
    }

    let mut new_source = String::with_capacity(source.len() + text.len());
    new_source.push_str(&source[..offset]);
    new_source.push_str(text);
    new_source.push_str(&source[offset..]);
    Ok(new_source)
}

/// Resolves the step's anchor against `source` and inserts its text.
pub fn apply_step(source: &str, step: &PatchStep) -> AppResult<String> {
    let offset = step.anchor.resolve(source)?;
    debug!(step = %step.name, offset, "Applying patch step");
    insert_at(source, offset, &step.text)
}

/// Applies steps in order.
///
/// Each anchor is resolved against the output of the previous step, since an
/// insertion shifts every offset after it.
pub fn apply_steps(source: &str, steps: &[PatchStep]) -> AppResult<String> {
    let mut current_source = source.to_string();
    for step in steps {
        current_source = apply_step(&current_source, step)?;
    }
    Ok(current_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn before_main(text: &str) -> PatchStep {
        PatchStep {
            name: "shim".into(),
            anchor: AnchorSpec::Declaration {
                pattern: r"fn main\(\)".into(),
            },
            text: text.into(),
        }
    }

    fn inside_main(text: &str) -> PatchStep {
        PatchStep {
            name: "call".into(),
            anchor: AnchorSpec::BlockEntry {
                declaration: r"fn main\(\)".into(),
                opener: '{',
                nested: None,
                window: 100,
            },
            text: text.into(),
        }
    }

    #[test]
    fn test_insert_at_bounds() {
        assert_eq!(insert_at("abc", 0, "X").unwrap(), "Xabc");
        assert_eq!(insert_at("abc", 3, "X").unwrap(), "abcX");
        assert_eq!(insert_at("abc", 1, "X").unwrap(), "aXbc");
    }

    #[test]
    fn test_insert_at_rejects_non_boundary() {
        assert!(insert_at("é", 1, "X").is_err());
        assert!(insert_at("abc", 4, "X").is_err());
    }

    #[test]
    fn test_chained_steps_relocate_after_shift() {
        let code = "fn main() {\n    run();\n}\n";
        let steps = vec![
            before_main("fn shim() {}\n\n"),
            inside_main("\n    shim();"),
        ];

        let res = apply_steps(code, &steps).unwrap();
        assert_eq!(
            res,
            "fn shim() {}\n\nfn main() {\n    shim();\n    run();\n}\n"
        );
    }

    #[test]
    fn test_precomputed_offsets_would_corrupt() {
        // Offsets taken from the original text land inside the inserted shim.
        let code = "fn main() {\n    run();\n}\n";
        let stale = inside_main("").anchor.resolve(code).unwrap();
        let after_first = apply_step(code, &before_main("fn shim() {}\n\n")).unwrap();
        let fresh = inside_main("").anchor.resolve(&after_first).unwrap();
        assert_ne!(stale, fresh);
        assert_eq!(&after_first[..fresh], "fn shim() {}\n\nfn main() {");
    }

    #[test]
    fn test_missing_anchor_stops_chain() {
        let steps = vec![before_main("x"), inside_main("y")];
        let err = apply_steps("fn other() {}", &steps).unwrap_err();
        assert!(matches!(err, AppError::AnchorNotFound { .. }));
    }
}
