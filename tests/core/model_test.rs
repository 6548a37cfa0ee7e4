#[cfg(test)]
mod tests {
    use drift::model::{
        expand_categories, parse_categories, ObjectCategory, ObjectKind, SchemaObject,
    };

    #[test]
    fn test_kind_round_trips_through_type_desc() {
        let tags = [
            "USER_TABLE",
            "VIEW",
            "SQL_STORED_PROCEDURE",
            "SQL_SCALAR_FUNCTION",
            "SQL_INLINE_TABLE_VALUED_FUNCTION",
            "SQL_TABLE_VALUED_FUNCTION",
            "SQL_TRIGGER",
        ];
        for tag in tags {
            let kind = ObjectKind::from_type_desc(tag);
            assert!(!matches!(kind, ObjectKind::Unknown(_)), "{tag} unrecognized");
            assert_eq!(kind.type_desc(), tag);
        }
    }

    #[test]
    fn test_unrecognized_tag_is_preserved() {
        let kind = ObjectKind::from_type_desc("SEQUENCE_OBJECT");
        assert_eq!(kind, ObjectKind::Unknown("SEQUENCE_OBJECT".to_string()));
        assert_eq!(kind.type_desc(), "SEQUENCE_OBJECT");
    }

    #[test]
    fn test_identity_matches_same_triple_only() {
        let a = SchemaObject::new("dbo", "Orders", ObjectKind::Table);
        let b = SchemaObject::new("dbo", "Orders", ObjectKind::Table);
        let c = SchemaObject::new("dbo", "Orders", ObjectKind::View);
        let d = SchemaObject::new("sales", "Orders", ObjectKind::Table);

        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        assert_ne!(a.identity(), d.identity());
    }

    #[test]
    fn test_display_formats_schema_name_and_kind() {
        let object = SchemaObject::new("dbo", "Orders", ObjectKind::Table);
        assert_eq!(object.to_string(), "dbo.Orders (USER_TABLE)");
    }

    #[test]
    fn test_parse_categories_is_case_insensitive() {
        assert_eq!(
            parse_categories(["table", "VIEW", "Procedure"]),
            vec![
                ObjectCategory::Table,
                ObjectCategory::View,
                ObjectCategory::Procedure
            ]
        );
    }

    #[test]
    fn test_parse_categories_drops_unknown_silently() {
        assert_eq!(
            parse_categories(["table", "sequence", "synonym", "trigger"]),
            vec![ObjectCategory::Table, ObjectCategory::Trigger]
        );
        assert!(parse_categories(["nonsense"]).is_empty());
    }

    #[test]
    fn test_parse_categories_deduplicates_preserving_order() {
        assert_eq!(
            parse_categories(["view", "table", "VIEW", "table"]),
            vec![ObjectCategory::View, ObjectCategory::Table]
        );
    }

    #[test]
    fn test_function_expands_to_three_kind_tags() {
        assert_eq!(
            ObjectCategory::Function.kind_tags(),
            &[
                "SQL_SCALAR_FUNCTION",
                "SQL_INLINE_TABLE_VALUED_FUNCTION",
                "SQL_TABLE_VALUED_FUNCTION"
            ]
        );
    }

    #[test]
    fn test_expand_categories_flattens_in_request_order() {
        let tags = expand_categories(&[ObjectCategory::Function, ObjectCategory::Table]);
        assert_eq!(
            tags,
            vec![
                "SQL_SCALAR_FUNCTION",
                "SQL_INLINE_TABLE_VALUED_FUNCTION",
                "SQL_TABLE_VALUED_FUNCTION",
                "USER_TABLE"
            ]
        );
        assert!(expand_categories(&[]).is_empty());
    }

    #[test]
    fn test_all_categories_cover_all_known_tags() {
        let tags = expand_categories(&ObjectCategory::ALL);
        assert_eq!(tags.len(), 7);
        for tag in &tags {
            assert!(!matches!(
                ObjectKind::from_type_desc(tag),
                ObjectKind::Unknown(_)
            ));
        }
    }
}
