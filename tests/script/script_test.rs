#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use drift::model::{DiffOutcome, ObjectCategory, ObjectKind, SchemaObject, Side};
    use drift::script::{script_file_name, DebugSink, ScriptWriter};

    fn temp_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("drift-test-{}-{test}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn outcome(object: SchemaObject, script: &str) -> DiffOutcome {
        DiffOutcome {
            object,
            exists_in_target: true,
            has_difference: true,
            remediation_script: script.to_string(),
        }
    }

    #[test]
    fn test_script_file_name_template() {
        assert_eq!(
            script_file_name(
                "AppDb",
                "AppDb_Staging",
                &[ObjectCategory::Table, ObjectCategory::View],
                "20240101120000"
            ),
            "schema-diff-AppDb-AppDb_Staging-TABLE-VIEW-20240101120000.sql"
        );
    }

    #[test]
    fn test_artifact_layout() {
        let dir = temp_dir("artifact-layout");
        let path = dir.join("out.sql");

        let outcomes = vec![
            outcome(
                SchemaObject::new("dbo", "P1", ObjectKind::Procedure),
                "IF OBJECT_ID('[dbo].[P1]', 'P') IS NOT NULL DROP PROCEDURE [dbo].[P1];\nGO\nCREATE PROCEDURE [dbo].[P1] AS SELECT 1",
            ),
            outcome(
                SchemaObject::new("dbo", "V1", ObjectKind::View),
                "CREATE VIEW [dbo].[V1] AS SELECT 1\n",
            ),
        ];

        ScriptWriter::new(&path).write(&outcomes).expect("write artifact");

        let written = fs::read_to_string(&path).expect("read artifact");
        assert_eq!(
            written,
            "-- Schema comparison script\n\
             -- Differences found between databases\n\
             \n\
             -- Object: dbo.P1 (SQL_STORED_PROCEDURE)\n\
             IF OBJECT_ID('[dbo].[P1]', 'P') IS NOT NULL DROP PROCEDURE [dbo].[P1];\n\
             GO\n\
             CREATE PROCEDURE [dbo].[P1] AS SELECT 1\n\
             GO\n\
             \n\
             -- Object: dbo.V1 (VIEW)\n\
             CREATE VIEW [dbo].[V1] AS SELECT 1\n\
             GO\n\
             \n"
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_report_still_writes_header() {
        let dir = temp_dir("empty-report");
        let path = dir.join("out.sql");

        ScriptWriter::new(&path).write(&[]).expect("write artifact");

        let written = fs::read_to_string(&path).expect("read artifact");
        assert_eq!(
            written,
            "-- Schema comparison script\n-- Differences found between databases\n\n"
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_failure_reports_path() {
        let missing = PathBuf::from("/nonexistent-drift-dir/out.sql");
        let error = ScriptWriter::new(&missing)
            .write(&[])
            .expect_err("write into a missing directory must fail");
        assert!(error.to_string().contains("/nonexistent-drift-dir/out.sql"));
    }

    #[tokio::test]
    async fn test_debug_sink_writes_run_scoped_snapshots() {
        let base = temp_dir("debug-sink");

        let sink = DebugSink::create_in(&base, "AppDb", "AppDb_Staging", "20240101120000")
            .expect("create sink");
        assert_eq!(
            sink.dir(),
            base.join("logs-AppDb-AppDb_Staging-20240101120000")
        );

        let view = SchemaObject::new("dbo", "V1", ObjectKind::View);
        sink.write_snapshot(Side::Source, &view, "CREATE VIEW dbo.V1 AS SELECT 1")
            .await;
        sink.write_snapshot(Side::Target, &view, "CREATE VIEW dbo.V1 AS SELECT 2")
            .await;

        let source_snapshot = sink.dir().join("SOURCE-VIEW-dbo-V1.sql");
        let target_snapshot = sink.dir().join("TARGET-VIEW-dbo-V1.sql");
        assert_eq!(
            fs::read_to_string(source_snapshot).expect("read source snapshot"),
            "CREATE VIEW dbo.V1 AS SELECT 1"
        );
        assert_eq!(
            fs::read_to_string(target_snapshot).expect("read target snapshot"),
            "CREATE VIEW dbo.V1 AS SELECT 2"
        );

        fs::remove_dir_all(&base).ok();
    }
}
