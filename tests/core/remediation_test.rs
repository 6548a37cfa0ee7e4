#[cfg(test)]
mod tests {
    use drift::model::{ObjectKind, SchemaObject};
    use drift::remediation::{
        drop_statement_for, terminate_batch, DropStatement, BATCH_SEPARATOR,
    };

    fn object(kind: ObjectKind) -> SchemaObject {
        SchemaObject::new("dbo", "Thing", kind)
    }

    #[test]
    fn test_table_delegates_to_repository() {
        assert_eq!(
            drop_statement_for(&object(ObjectKind::Table)),
            DropStatement::FromRepository
        );
    }

    #[test]
    fn test_view_drop_statement() {
        let statement = drop_statement_for(&object(ObjectKind::View));
        assert_eq!(
            statement,
            DropStatement::Inline(
                "IF OBJECT_ID('[dbo].[Thing]', 'V') IS NOT NULL DROP VIEW [dbo].[Thing];"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_procedure_drop_statement() {
        let statement = drop_statement_for(&object(ObjectKind::Procedure));
        assert_eq!(
            statement,
            DropStatement::Inline(
                "IF OBJECT_ID('[dbo].[Thing]', 'P') IS NOT NULL DROP PROCEDURE [dbo].[Thing];"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_all_function_kinds_share_the_function_template() {
        let expected = DropStatement::Inline(
            "IF OBJECT_ID('[dbo].[Thing]', 'FN') IS NOT NULL DROP FUNCTION [dbo].[Thing];"
                .to_string(),
        );
        for kind in [
            ObjectKind::ScalarFunction,
            ObjectKind::InlineTableValuedFunction,
            ObjectKind::TableValuedFunction,
        ] {
            assert_eq!(drop_statement_for(&object(kind)), expected);
        }
    }

    #[test]
    fn test_trigger_drop_statement() {
        let statement = drop_statement_for(&object(ObjectKind::Trigger));
        assert_eq!(
            statement,
            DropStatement::Inline(
                "IF OBJECT_ID('[dbo].[Thing]', 'TR') IS NOT NULL DROP TRIGGER [dbo].[Thing];"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_unknown_kind_never_fails() {
        let statement =
            drop_statement_for(&object(ObjectKind::Unknown("SEQUENCE_OBJECT".to_string())));
        let DropStatement::Inline(comment) = statement else {
            panic!("unknown kinds must produce an inline comment");
        };
        assert_eq!(
            comment,
            "-- Unknown object type: SEQUENCE_OBJECT. It must be deleted manually."
        );
    }

    #[test]
    fn test_terminate_batch_appends_separator_line() {
        assert_eq!(terminate_batch("DROP VIEW [dbo].[V];"), "DROP VIEW [dbo].[V];\nGO");
        assert_eq!(BATCH_SEPARATOR, "GO");
    }

    #[test]
    fn test_unknown_kind_comment_is_batch_terminated() {
        let DropStatement::Inline(comment) =
            drop_statement_for(&object(ObjectKind::Unknown("EDGE_CONSTRAINT".to_string())))
        else {
            panic!("unknown kinds must produce an inline comment");
        };
        let terminated = terminate_batch(&comment);
        assert!(terminated.ends_with("\nGO"));
        assert!(terminated.starts_with("-- Unknown object type: EDGE_CONSTRAINT"));
    }
}
