//! SQL Server implementation of the repository contract.
//!
//! Object listings come from `sys.objects`; view/procedure/function/trigger
//! definitions from `sys.sql_modules`. Table definitions have no stored
//! source text, so they are reconstructed from `sys.columns`, `sys.indexes`,
//! and the constraint catalogs, with foreign keys scripted separately and
//! appended. The composite table-drop script likewise drops referencing
//! foreign-key and default constraints before the table itself.

use async_trait::async_trait;
use tiberius::{AuthMethod, Config, Row};

use crate::config::{ConnectionSettings, SettingsError};
use crate::model::{expand_categories, ObjectCategory, ObjectKind, SchemaObject};

use super::pool::ConnectionPool;
use super::{FetchError, ObjectRepository, RepositoryError};

const MODULE_DEFINITION_QUERY: &str = r#"
SELECT definition
FROM sys.sql_modules m
JOIN sys.objects o ON m.object_id = o.object_id
WHERE o.name = @P1 AND SCHEMA_NAME(o.schema_id) = @P2
"#;

// Reconstructs a CREATE TABLE script: columns (with identity and
// nullability), primary-key and unique constraints, then default
// constraints as separate GO-terminated ALTER TABLE batches.
const TABLE_DEFINITION_QUERY: &str = r#"
WITH IndexCTE AS (
    SELECT
        ic.object_id,
        ic.index_id,
        i.name AS index_name,
        i.type_desc AS index_type,
        i.is_primary_key,
        i.is_unique,
        i.is_unique_constraint,
        (
            SELECT c.name + ','
            FROM sys.index_columns ic2
            JOIN sys.columns c ON ic2.object_id = c.object_id AND ic2.column_id = c.column_id
            WHERE ic2.object_id = ic.object_id AND ic2.index_id = ic.index_id
            ORDER BY ic2.key_ordinal
            FOR XML PATH('')
        ) AS columns
    FROM sys.indexes i
    JOIN sys.index_columns ic ON i.object_id = ic.object_id AND i.index_id = ic.index_id
    WHERE i.name IS NOT NULL
    GROUP BY ic.object_id, ic.index_id, i.name, i.type_desc, i.is_primary_key, i.is_unique, i.is_unique_constraint
)
SELECT
    'CREATE TABLE [' + SCHEMA_NAME(t.schema_id) + '].[' + t.name + '] (' + CHAR(10) +
    (
        SELECT
            '    [' + c.name + '] ' +
            CASE
                WHEN c.is_computed = 1 THEN 'AS ' + cc.definition
                ELSE
                    '[' + tp.name + ']' +
                    CASE
                        WHEN tp.name IN ('varchar', 'nvarchar', 'char', 'nchar') THEN '(' +
                            CASE WHEN c.max_length = -1 THEN 'MAX'
                            ELSE
                                CASE WHEN tp.name IN ('nvarchar', 'nchar')
                                    THEN CAST(c.max_length/2 AS VARCHAR(10))
                                    ELSE CAST(c.max_length AS VARCHAR(10))
                                END
                            END + ')'
                        WHEN tp.name IN ('decimal', 'numeric') THEN '(' + CAST(c.precision AS VARCHAR(10)) + ', ' + CAST(c.scale AS VARCHAR(10)) + ')'
                        ELSE ''
                    END +
                    CASE WHEN c.is_identity = 1
                        THEN ' IDENTITY(' +
                            CAST(IDENT_SEED(SCHEMA_NAME(t.schema_id) + '.' + t.name) AS VARCHAR(10)) + ',' +
                            CAST(IDENT_INCR(SCHEMA_NAME(t.schema_id) + '.' + t.name) AS VARCHAR(10)) + ')'
                        ELSE ''
                    END +
                    CASE WHEN c.is_nullable = 1 THEN ' NULL' ELSE ' NOT NULL' END
            END +
            CASE WHEN c.column_id = (SELECT MAX(column_id) FROM sys.columns c2 WHERE c2.object_id = t.object_id) AND
                NOT EXISTS (SELECT 1 FROM sys.indexes i WHERE i.object_id = t.object_id AND i.is_primary_key = 1)
                THEN ''
                ELSE ','
            END + CHAR(10)
        FROM sys.columns c
        LEFT JOIN sys.types tp ON c.user_type_id = tp.user_type_id
        LEFT JOIN sys.computed_columns cc ON c.object_id = cc.object_id AND c.column_id = cc.column_id
        WHERE c.object_id = t.object_id
        ORDER BY c.column_id
        FOR XML PATH('')
    ) +
    ISNULL((
        SELECT
            CASE
                WHEN i.is_primary_key = 1 THEN '    CONSTRAINT [' + i.index_name + '] PRIMARY KEY ' +
                    CASE WHEN i.index_type LIKE '%CLUSTER%' THEN 'CLUSTERED' ELSE 'NONCLUSTERED' END +
                    ' (' + ISNULL(STUFF(i.columns, LEN(i.columns), 1, ''), '') + ')' + CHAR(10)
                WHEN i.is_unique_constraint = 1 THEN '    CONSTRAINT [' + i.index_name + '] UNIQUE ' +
                    CASE WHEN i.index_type LIKE '%CLUSTER%' THEN 'CLUSTERED' ELSE 'NONCLUSTERED' END +
                    ' (' + ISNULL(STUFF(i.columns, LEN(i.columns), 1, ''), '') + ')' + CHAR(10)
                ELSE ''
            END
        FROM IndexCTE i
        WHERE i.object_id = t.object_id
        AND (i.is_primary_key = 1 OR i.is_unique_constraint = 1)
        FOR XML PATH('')
    ), '') +
    ');' + CHAR(10) + 'GO' + CHAR(10) + CHAR(10) +
    ISNULL((
        SELECT
            'ALTER TABLE [' + SCHEMA_NAME(t.schema_id) + '].[' + t.name + '] ADD CONSTRAINT [' +
            dc.name + '] DEFAULT ' + dc.definition + ' FOR [' + c.name + '];' + CHAR(10) + 'GO' + CHAR(10) + CHAR(10)
        FROM sys.columns c
        JOIN sys.default_constraints dc ON c.default_object_id = dc.object_id
        WHERE c.object_id = t.object_id
        FOR XML PATH('')
    ), '')
FROM sys.tables t
WHERE t.name = @P1 AND SCHEMA_NAME(t.schema_id) = @P2
"#;

const FOREIGN_KEY_QUERY: &str = r#"
SELECT
    'ALTER TABLE [' + SCHEMA_NAME(tab.schema_id) + '].[' + tab.name + ']  WITH CHECK ADD  CONSTRAINT [' +
    fk.name + '] FOREIGN KEY([' +
    ISNULL(STUFF((
        SELECT ',' + COL_NAME(fkc.parent_object_id, fkc.parent_column_id)
        FROM sys.foreign_key_columns fkc
        WHERE fkc.constraint_object_id = fk.object_id
        ORDER BY fkc.constraint_column_id
        FOR XML PATH('')
    ), 1, 1, ''), '') + '])' +
    CHAR(10) + 'REFERENCES [' + SCHEMA_NAME(ref_tab.schema_id) + '].[' + ref_tab.name + '] ([' +
    ISNULL(STUFF((
        SELECT ',' + COL_NAME(fkc.referenced_object_id, fkc.referenced_column_id)
        FROM sys.foreign_key_columns fkc
        WHERE fkc.constraint_object_id = fk.object_id
        ORDER BY fkc.constraint_column_id
        FOR XML PATH('')
    ), 1, 1, ''), '') + '])' + CHAR(10) + 'GO' + CHAR(10) + CHAR(10) +
    'ALTER TABLE [' + SCHEMA_NAME(tab.schema_id) + '].[' + tab.name + '] CHECK CONSTRAINT [' +
    fk.name + ']' + CHAR(10)
FROM sys.foreign_keys fk
JOIN sys.tables tab ON fk.parent_object_id = tab.object_id
JOIN sys.tables ref_tab ON fk.referenced_object_id = ref_tab.object_id
WHERE tab.name = @P1 AND SCHEMA_NAME(tab.schema_id) = @P2
ORDER BY fk.name;
"#;

const TABLE_DROP_QUERY: &str = r#"
SELECT
    ISNULL(STUFF((
        SELECT CHAR(10) + 'ALTER TABLE [' + SCHEMA_NAME(tab.schema_id) + '].[' + tab.name + '] DROP CONSTRAINT [' + fk.name + ']' + CHAR(10) + 'GO' + CHAR(10)
        FROM sys.foreign_keys fk
        JOIN sys.tables tab ON fk.parent_object_id = tab.object_id
        WHERE tab.name = @P1 AND SCHEMA_NAME(tab.schema_id) = @P2
        FOR XML PATH('')
    ), 1, 1, ''), '') +
    ISNULL(STUFF((
        SELECT CHAR(10) + 'ALTER TABLE [' + SCHEMA_NAME(t.schema_id) + '].[' + t.name + '] DROP CONSTRAINT [' + dc.name + ']' + CHAR(10) + 'GO' + CHAR(10)
        FROM sys.tables t
        JOIN sys.default_constraints dc ON t.object_id = dc.parent_object_id
        WHERE t.name = @P1 AND SCHEMA_NAME(t.schema_id) = @P2
        FOR XML PATH('')
    ), 1, 1, ''), '') +
    CHAR(10) + 'IF OBJECT_ID(''[' + @P2 + '].[' + @P1 + ']'', ''U'') IS NOT NULL' + CHAR(10) +
    'DROP TABLE [' + @P2 + '].[' + @P1 + ']' + CHAR(10)
"#;

/// SQL Server repository backed by a small connection pool.
pub struct MsSqlRepository {
    database: String,
    pool: ConnectionPool,
}

impl MsSqlRepository {
    /// Resolve the connection settings and dial the database. Connectivity
    /// failure here is fatal for the run.
    pub async fn connect(
        settings: &ConnectionSettings,
        pool_size: usize,
    ) -> Result<Self, RepositoryError> {
        let server = settings.resolved_server().map_err(config_err)?;
        let user = settings.resolved_user().map_err(config_err)?;
        let password = settings.resolved_password().map_err(config_err)?;
        let database = settings.resolved_database().map_err(config_err)?;

        let mut config = Config::new();
        config.host(&server);
        config.port(settings.port);
        config.database(&database);
        config.authentication(AuthMethod::sql_server(&user, &password));
        config.application_name("drift");
        config.trust_cert();

        let pool = ConnectionPool::connect(config, pool_size)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        Ok(Self { database, pool })
    }

    async fn module_definition(&self, object: &SchemaObject) -> Result<String, FetchError> {
        let mut conn = self.pool.acquire().await.map_err(fetch_err)?;
        let row = conn
            .query(MODULE_DEFINITION_QUERY, &[&object.name, &object.schema])
            .await
            .map_err(fetch_err)?
            .into_row()
            .await
            .map_err(fetch_err)?;
        conn.release();

        let row = row.ok_or_else(|| not_found(object))?;
        let definition: &str = row.get(0).ok_or_else(|| not_found(object))?;
        Ok(definition.to_string())
    }

    async fn table_definition(&self, object: &SchemaObject) -> Result<String, FetchError> {
        let mut conn = self.pool.acquire().await.map_err(fetch_err)?;
        let row = conn
            .query(TABLE_DEFINITION_QUERY, &[&object.name, &object.schema])
            .await
            .map_err(fetch_err)?
            .into_row()
            .await
            .map_err(fetch_err)?;

        let row = row.ok_or_else(|| not_found(object))?;
        let mut definition = row
            .get::<&str, _>(0)
            .ok_or_else(|| not_found(object))?
            .to_string();

        // Foreign keys are scripted separately and appended.
        let fk_rows = conn
            .query(FOREIGN_KEY_QUERY, &[&object.name, &object.schema])
            .await
            .map_err(fetch_err)?
            .into_first_result()
            .await
            .map_err(fetch_err)?;
        conn.release();

        let constraints: Vec<&str> = fk_rows.iter().filter_map(|row| row.get(0)).collect();
        if !constraints.is_empty() {
            definition.push('\n');
            definition.push_str(&constraints.join("\n"));
        }

        Ok(definition)
    }
}

#[async_trait]
impl ObjectRepository for MsSqlRepository {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_objects(
        &self,
        categories: &[ObjectCategory],
    ) -> Result<Vec<SchemaObject>, RepositoryError> {
        let tags = expand_categories(categories);
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let type_list = tags
            .iter()
            .map(|tag| format!("'{tag}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
SELECT
    SCHEMA_NAME(o.schema_id) AS schema_name,
    o.name AS object_name,
    o.type_desc AS object_type
FROM sys.objects o
WHERE o.type_desc IN ({type_list})
    AND o.is_ms_shipped = 0
ORDER BY o.type_desc, o.name
"#
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let rows = conn
            .simple_query(sql)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_first_result()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        conn.release();

        let mut objects = Vec::with_capacity(rows.len());
        for row in &rows {
            objects.push(SchemaObject::new(
                required_column(row, 0)?,
                required_column(row, 1)?,
                ObjectKind::from_type_desc(required_column(row, 2)?),
            ));
        }
        Ok(objects)
    }

    async fn get_definition(&self, object: &SchemaObject) -> Result<String, FetchError> {
        match object.kind {
            ObjectKind::Table => self.table_definition(object).await,
            _ => self.module_definition(object).await,
        }
    }

    async fn get_table_drop_statement(&self, object: &SchemaObject) -> Result<String, FetchError> {
        let mut conn = self.pool.acquire().await.map_err(fetch_err)?;
        let row = conn
            .query(TABLE_DROP_QUERY, &[&object.name, &object.schema])
            .await
            .map_err(fetch_err)?
            .into_row()
            .await
            .map_err(fetch_err)?;
        conn.release();

        let row = row.ok_or_else(|| not_found(object))?;
        let statement: &str = row.get(0).ok_or_else(|| not_found(object))?;
        Ok(statement.to_string())
    }
}

fn config_err(e: SettingsError) -> RepositoryError {
    RepositoryError::Connection(e.to_string())
}

fn fetch_err(e: tiberius::error::Error) -> FetchError {
    FetchError::Query(e.to_string())
}

fn not_found(object: &SchemaObject) -> FetchError {
    FetchError::NotFound {
        object: object.to_string(),
    }
}

fn required_column<'a>(row: &'a Row, index: usize) -> Result<&'a str, RepositoryError> {
    row.get(index)
        .ok_or_else(|| RepositoryError::Query(format!("catalog row is missing column {index}")))
}
