//! DROP statement synthesis for differing objects.
//!
//! Every kind of object maps to a guarded `IF OBJECT_ID(...) DROP ...`
//! statement, except tables, whose drop scripts must also remove referencing
//! foreign-key and default constraints and therefore come from the
//! repository's composite table-drop query. Unrecognized kinds degrade to a
//! manual-action comment instead of failing the run.

use crate::model::{ObjectKind, SchemaObject};

/// T-SQL batch separator; terminates every generated drop statement.
pub const BATCH_SEPARATOR: &str = "GO";

/// How to obtain the drop statement for one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropStatement {
    /// Statement generated locally, ready to emit.
    Inline(String),
    /// Table drops are composed by the repository (constraint drops first,
    /// then the guarded `DROP TABLE`).
    FromRepository,
}

/// Generate the drop statement for an object, dispatched on its kind.
///
/// Never fails: unknown kinds yield a comment asking for manual removal.
pub fn drop_statement_for(object: &SchemaObject) -> DropStatement {
    match &object.kind {
        ObjectKind::Table => DropStatement::FromRepository,
        ObjectKind::View => DropStatement::Inline(object_id_drop(object, "V", "VIEW")),
        ObjectKind::Procedure => DropStatement::Inline(object_id_drop(object, "P", "PROCEDURE")),
        ObjectKind::ScalarFunction
        | ObjectKind::InlineTableValuedFunction
        | ObjectKind::TableValuedFunction => {
            DropStatement::Inline(object_id_drop(object, "FN", "FUNCTION"))
        }
        ObjectKind::Trigger => DropStatement::Inline(object_id_drop(object, "TR", "TRIGGER")),
        ObjectKind::Unknown(tag) => DropStatement::Inline(format!(
            "-- Unknown object type: {tag}. It must be deleted manually."
        )),
    }
}

/// Append the batch-separator line to a statement.
pub fn terminate_batch(statement: &str) -> String {
    format!("{statement}\n{BATCH_SEPARATOR}")
}

fn object_id_drop(object: &SchemaObject, object_id_tag: &str, drop_keyword: &str) -> String {
    format!(
        "IF OBJECT_ID('[{schema}].[{name}]', '{object_id_tag}') IS NOT NULL DROP {drop_keyword} [{schema}].[{name}];",
        schema = object.schema,
        name = object.name,
    )
}
