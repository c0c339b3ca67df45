use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use askql_app::connection_error::{ConnectionErrorInfo, ConnectionErrorKind};
use askql_app::ports::{ExecutionError, IntrospectionError, QueryExecutor, SchemaIntrospector};
use askql_domain::{ColumnRow, ForeignKeyRow, IntrospectionRows, QueryResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// One round trip: database name, every user column in catalog order, and
// every foreign key expanded to one row per column pair. Tables outside
// `public` are reported as `schema.table`.
const SCHEMA_QUERY: &str = r#"
SELECT json_build_object(
    'database_name', current_database(),
    'columns', COALESCE((
        SELECT json_agg(row_to_json(c) ORDER BY c.schema_name, c.relname, c.attnum)
        FROM (
            SELECT
                CASE WHEN n.nspname = 'public' THEN cl.relname
                     ELSE n.nspname || '.' || cl.relname END AS "table",
                a.attname AS "column",
                pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
                NOT a.attnotnull AS nullable,
                n.nspname AS schema_name,
                cl.relname,
                a.attnum
            FROM pg_class cl
            JOIN pg_namespace n ON n.oid = cl.relnamespace
            JOIN pg_attribute a ON a.attrelid = cl.oid
            WHERE cl.relkind IN ('r', 'p', 'v', 'm', 'f')
              AND a.attnum > 0
              AND NOT a.attisdropped
              AND n.nspname NOT IN ('pg_catalog', 'information_schema')
              AND n.nspname NOT LIKE 'pg_toast%'
              AND n.nspname NOT LIKE 'pg_temp%'
        ) c
    ), '[]'::json),
    'foreign_keys', COALESCE((
        SELECT json_agg(row_to_json(f) ORDER BY f.schema_name, f.relname, f.conname, f.pos)
        FROM (
            SELECT
                CASE WHEN n1.nspname = 'public' THEN c1.relname
                     ELSE n1.nspname || '.' || c1.relname END AS from_table,
                a1.attname AS from_column,
                CASE WHEN n2.nspname = 'public' THEN c2.relname
                     ELSE n2.nspname || '.' || c2.relname END AS to_table,
                a2.attname AS to_column,
                n1.nspname AS schema_name,
                c1.relname,
                con.conname,
                k.pos
            FROM pg_constraint con
            JOIN pg_class c1 ON c1.oid = con.conrelid
            JOIN pg_namespace n1 ON n1.oid = c1.relnamespace
            JOIN pg_class c2 ON c2.oid = con.confrelid
            JOIN pg_namespace n2 ON n2.oid = c2.relnamespace
            CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
                WITH ORDINALITY AS k(from_attnum, to_attnum, pos)
            JOIN pg_attribute a1 ON a1.attrelid = c1.oid AND a1.attnum = k.from_attnum
            JOIN pg_attribute a2 ON a2.attrelid = c2.oid AND a2.attnum = k.to_attnum
            WHERE con.contype = 'f'
              AND n1.nspname NOT IN ('pg_catalog', 'information_schema')
        ) f
    ), '[]'::json)
)
"#;

// Applied through PGOPTIONS so the server rejects writes even inside
// functions the statement calls.
const READ_ONLY_OPTIONS: &str = "-c default_transaction_read_only=on";

/// Talks to PostgreSQL through the `psql` binary, so no driver is linked.
pub struct PostgresAdapter {
    introspection_timeout_secs: u64,
    execution_timeout_secs: u64,
    read_only: bool,
}

/// Why a psql run produced no usable stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PsqlFailure {
    Spawn(String),
    Io(String),
    Timeout,
    Exit { stderr: String },
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    /// One unaligned tuple-only value, used for the catalog JSON.
    Scalar,
    Csv,
}

impl OutputFormat {
    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Scalar => &["-t", "-A"],
            Self::Csv => &["--csv"],
        }
    }
}

impl PostgresAdapter {
    pub fn new(introspection_timeout_secs: u64) -> Self {
        Self {
            introspection_timeout_secs,
            execution_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_only: true,
        }
    }

    #[must_use]
    pub fn with_execution(mut self, timeout_secs: u64, read_only: bool) -> Self {
        self.execution_timeout_secs = timeout_secs;
        self.read_only = read_only;
        self
    }

    fn command(dsn: &str, query: &str, format: OutputFormat, read_only: bool) -> Command {
        let mut cmd = Command::new("psql");
        cmd.arg(dsn)
            .arg("-X") // Ignore .psqlrc to avoid unexpected output
            .arg("-v")
            .arg("ON_ERROR_STOP=1")
            .args(format.args())
            .arg("-c")
            .arg(query)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if read_only {
            cmd.env("PGOPTIONS", READ_ONLY_OPTIONS);
        }
        cmd
    }

    async fn run_psql(mut cmd: Command, timeout_secs: u64) -> Result<String, PsqlFailure> {
        let mut child = cmd.spawn().map_err(|e| PsqlFailure::Spawn(e.to_string()))?;

        // Drain both pipes before wait() so a full buffer cannot deadlock psql.
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = timeout(Duration::from_secs(timeout_secs), async {
            let (stdout_result, stderr_result) = tokio::join!(
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut out) = stdout_handle {
                        out.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                },
                async {
                    let mut buf = Vec::new();
                    if let Some(ref mut err) = stderr_handle {
                        err.read_to_end(&mut buf).await?;
                    }
                    Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
                }
            );
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout_result?, stderr_result?))
        })
        .await
        .map_err(|_| PsqlFailure::Timeout)?
        .map_err(|e| PsqlFailure::Io(e.to_string()))?;

        if !status.success() {
            return Err(PsqlFailure::Exit { stderr });
        }
        Ok(stdout)
    }
}

impl Default for PostgresAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

#[async_trait]
impl SchemaIntrospector for PostgresAdapter {
    async fn fetch_schema(&self, dsn: &str) -> Result<IntrospectionRows, IntrospectionError> {
        tracing::debug!(
            timeout_secs = self.introspection_timeout_secs,
            "introspecting schema via psql"
        );
        // Catalog reads never need write access.
        let cmd = Self::command(dsn, SCHEMA_QUERY, OutputFormat::Scalar, true);
        let json = Self::run_psql(cmd, self.introspection_timeout_secs)
            .await
            .map_err(introspection_failure)?;
        let rows = parse_schema(&json)?;
        tracing::debug!(
            columns = rows.columns.len(),
            foreign_keys = rows.foreign_keys.len(),
            "catalog rows received"
        );
        Ok(rows)
    }
}

#[async_trait]
impl QueryExecutor for PostgresAdapter {
    async fn execute(&self, dsn: &str, sql: &str) -> Result<QueryResult, ExecutionError> {
        let start = Instant::now();
        let cmd = Self::command(dsn, sql, OutputFormat::Csv, self.read_only);
        let csv = Self::run_psql(cmd, self.execution_timeout_secs)
            .await
            .map_err(execution_failure)?;
        let result = parse_csv(&csv)?;
        tracing::info!(
            rows = result.row_count(),
            columns = result.column_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            read_only = self.read_only,
            "query executed"
        );
        Ok(result)
    }
}

fn introspection_failure(failure: PsqlFailure) -> IntrospectionError {
    match failure {
        PsqlFailure::Spawn(e) => IntrospectionError::ConnectionFailed(
            ConnectionErrorInfo::with_kind(ConnectionErrorKind::PsqlNotFound, &e),
        ),
        PsqlFailure::Io(e) => IntrospectionError::QueryFailed(e),
        PsqlFailure::Timeout => IntrospectionError::Timeout,
        PsqlFailure::Exit { stderr } => classify_failure(&stderr),
    }
}

fn execution_failure(failure: PsqlFailure) -> ExecutionError {
    match failure {
        PsqlFailure::Spawn(e) => ExecutionError::ConnectionFailed(ConnectionErrorInfo::with_kind(
            ConnectionErrorKind::PsqlNotFound,
            &e,
        )),
        PsqlFailure::Io(e) => ExecutionError::QueryFailed(e),
        PsqlFailure::Timeout => ExecutionError::Timeout,
        PsqlFailure::Exit { stderr } => ExecutionError::from_stderr(&stderr),
    }
}

/// Connection problems become `ConnectionFailed`; anything else is a query
/// error. Both keep only masked stderr.
fn classify_failure(stderr: &str) -> IntrospectionError {
    let info = ConnectionErrorInfo::new(stderr);
    match info.kind {
        ConnectionErrorKind::Unknown => IntrospectionError::QueryFailed(info.masked_details),
        ConnectionErrorKind::Timeout => IntrospectionError::Timeout,
        _ => IntrospectionError::ConnectionFailed(info),
    }
}

/// psql `--csv` output: a header line, then one record per row. Statements
/// that return no rows print nothing.
fn parse_csv(output: &str) -> Result<QueryResult, ExecutionError> {
    if output.trim().is_empty() {
        return Ok(QueryResult::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(output.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ExecutionError::QueryFailed(format!("CSV parse error: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| ExecutionError::QueryFailed(format!("CSV parse error: {e}")))
        })
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(QueryResult::new(columns, rows))
}

fn parse_schema(json: &str) -> Result<IntrospectionRows, IntrospectionError> {
    #[derive(Deserialize)]
    struct RawSchema {
        database_name: String,
        #[serde(default)]
        columns: Vec<ColumnRow>,
        #[serde(default)]
        foreign_keys: Vec<ForeignKeyRow>,
    }

    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(IntrospectionError::InvalidJson(
            "psql returned no output".to_string(),
        ));
    }
    let raw: RawSchema =
        serde_json::from_str(trimmed).map_err(|e| IntrospectionError::InvalidJson(e.to_string()))?;

    Ok(IntrospectionRows {
        database_name: raw.database_name,
        columns: raw.columns,
        foreign_keys: raw.foreign_keys,
    })
}
