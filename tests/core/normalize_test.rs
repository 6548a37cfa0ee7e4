#[cfg(test)]
mod tests {
    use drift::normalize::normalize;

    #[test]
    fn test_tabs_become_single_spaces() {
        assert_eq!(normalize("SELECT\t1"), "SELECT 1");
        assert_eq!(normalize("a\t\tb"), "a b");
    }

    #[test]
    fn test_space_runs_collapse_to_one() {
        assert_eq!(normalize("SELECT    *   FROM  t"), "SELECT * FROM t");
        assert_eq!(normalize("a                    b"), "a b");
    }

    #[test]
    fn test_no_double_space_survives() {
        let samples = [
            "a  b   c    d",
            "mixed\t \tseparators  here",
            "   leading and trailing   ",
        ];
        for sample in samples {
            let normalized = normalize(sample);
            assert!(
                !normalized.contains("  "),
                "double space survived in {normalized:?}"
            );
        }
    }

    #[test]
    fn test_crlf_becomes_lf() {
        assert_eq!(normalize("line1\r\nline2"), "line1\nline2");
        assert_eq!(normalize("a\r\nb\r\nc"), "a\nb\nc");
    }

    #[test]
    fn test_lines_are_trimmed() {
        assert_eq!(normalize("  SELECT 1\n   FROM t  "), "SELECT 1\nFROM t");
    }

    #[test]
    fn test_whole_result_is_trimmed() {
        assert_eq!(normalize("\n\n  body  \n\n"), "body");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t  \r\n  "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "CREATE VIEW [dbo].[V1]\r\nAS\r\n\tSELECT   1",
            "  a\t b \r\n  c  ",
            "already normalized",
            "multi\nline\ninput",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_only_whitespace_is_affected() {
        let normalized = normalize("Create   View [DBO].[v1] -- With a COMMENT\t");
        assert_eq!(normalized, "Create View [DBO].[v1] -- With a COMMENT");
    }

    #[test]
    fn test_tab_space_crlf_variants_normalize_equal() {
        let with_tabs = "CREATE VIEW dbo.V1\r\nAS\r\n\tSELECT 1";
        let with_spaces = "CREATE VIEW dbo.V1\nAS\n    SELECT 1";
        assert_eq!(normalize(with_tabs), normalize(with_spaces));
    }
}
