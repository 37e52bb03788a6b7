// used for persistence
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

use crate::catalog::OperationCatalog;
use crate::error::{ConcordError, Result};
use crate::report::GenerationReport;

/// Where the persistor keeps its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub i64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "run {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run: RunId,
    pub seed: u64,
    pub fingerprint: String,
    pub digest: String,
    pub expressions: usize,
    pub generated_at: DateTime<Utc>,
}

/// Expressions present in one run but not in the other, each in its run's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiff {
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
}

impl RunDiff {
    pub fn between(first: &[String], second: &[String]) -> Self {
        let in_first: BTreeSet<&str> = first.iter().map(String::as_str).collect();
        let in_second: BTreeSet<&str> = second.iter().map(String::as_str).collect();
        Self {
            only_in_first: first
                .iter()
                .filter(|s| !in_second.contains(s.as_str()))
                .cloned()
                .collect(),
            only_in_second: second
                .iter()
                .filter(|s| !in_first.contains(s.as_str()))
                .cloned()
                .collect(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.only_in_first.is_empty() && self.only_in_second.is_empty()
    }
}

// seeds are stored bit-for-bit in sqlite's signed integers
fn seed_to_sql(seed: u64) -> i64 {
    seed as i64
}
fn seed_from_sql(stored: i64) -> u64 {
    stored as u64
}

// ------------- Persistence -------------
pub struct Persistor {
    connection: Connection,
}

impl Persistor {
    pub fn new(mode: PersistenceMode) -> Result<Self> {
        let connection = match &mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        // The "STRICT" keyword introduced in 3.37.0 breaks JDBC connections, which makes
        // debugging using an external tool like DBeaver impossible
        connection.execute_batch(
            "
            create table if not exists Catalog (
                Catalog_Fingerprint text not null,
                FormatVersion integer not null,
                Snapshot text not null,
                StoredAt text not null,
                constraint referenceable_Catalog_Fingerprint primary key (
                    Catalog_Fingerprint
                )
            );-- STRICT;
            create table if not exists Run (
                Run_Identity integer not null,
                Seed integer not null,
                Catalog_Fingerprint text not null,
                Digest text not null,
                ExpressionCount integer not null,
                GeneratedAt text not null,
                constraint Run_uses_Catalog foreign key (
                    Catalog_Fingerprint
                ) references Catalog(Catalog_Fingerprint),
                constraint referenceable_Run_Identity primary key (
                    Run_Identity
                )
            );-- STRICT;
            create table if not exists Expression (
                Run_Identity integer not null,
                Position integer not null,
                Descriptor integer not null,
                Syntax text not null,
                constraint Expression_in_Run foreign key (
                    Run_Identity
                ) references Run(Run_Identity),
                constraint unique_Expression primary key (
                    Run_Identity,
                    Position
                )
            );-- STRICT;
            ",
        )?;
        debug!(?mode, "persistence opened");
        Ok(Self { connection })
    }

    /// Stores the catalog snapshot under its fingerprint. Returns the
    /// fingerprint and whether it was already stored.
    pub fn persist_catalog(&mut self, catalog: &OperationCatalog) -> Result<(String, bool)> {
        let snapshot = catalog.to_json()?;
        let fingerprint = blake3::hash(snapshot.as_bytes()).to_hex().to_string();
        let inserted = self.connection.execute(
            "
            insert or ignore into Catalog (
                Catalog_Fingerprint,
                FormatVersion,
                Snapshot,
                StoredAt
            ) values (?, ?, ?, ?)
            ",
            params![
                &fingerprint,
                crate::catalog::CATALOG_FORMAT_VERSION,
                &snapshot,
                Utc::now()
            ],
        )?;
        Ok((fingerprint, inserted == 0))
    }

    pub fn restore_catalog(&self, fingerprint: &str) -> Result<Option<OperationCatalog>> {
        let snapshot: Option<String> = self
            .connection
            .query_row(
                "select Snapshot from Catalog where Catalog_Fingerprint = ?",
                params![fingerprint],
                |r| r.get(0),
            )
            .optional()?;
        snapshot.map(|json| OperationCatalog::from_json(&json)).transpose()
    }

    /// Stores a run and its expressions in emission order.
    pub fn persist_run(
        &mut self,
        catalog: &OperationCatalog,
        report: &GenerationReport,
    ) -> Result<RunId> {
        let (fingerprint, _) = self.persist_catalog(catalog)?;
        let tx = self.connection.transaction()?;
        tx.execute(
            "
            insert into Run (
                Seed,
                Catalog_Fingerprint,
                Digest,
                ExpressionCount,
                GeneratedAt
            ) values (?, ?, ?, ?, ?)
            ",
            params![
                seed_to_sql(report.seed),
                &fingerprint,
                report.digest(),
                report.emitted() as i64,
                Utc::now()
            ],
        )?;
        let run = RunId(tx.last_insert_rowid());
        {
            let mut add_expression = tx.prepare(
                "
                insert into Expression (
                    Run_Identity,
                    Position,
                    Descriptor,
                    Syntax
                ) values (?, ?, ?, ?)
                ",
            )?;
            for (position, expression) in report.expressions.iter().enumerate() {
                add_expression.execute(params![
                    run.0,
                    position as i64,
                    expression.descriptor.0 as i64,
                    &expression.syntax
                ])?;
            }
        }
        tx.commit()?;
        info!(%run, seed = report.seed, expressions = report.emitted(), "run persisted");
        Ok(run)
    }

    pub fn run(&self, run: RunId) -> Result<Option<RunRecord>> {
        Ok(self
            .connection
            .query_row(
                "
                select Run_Identity, Seed, Catalog_Fingerprint, Digest, ExpressionCount, GeneratedAt
                    from Run
                    where Run_Identity = ?
                ",
                params![run.0],
                Self::run_record,
            )
            .optional()?)
    }

    /// The most recently stored run generated from `seed`.
    pub fn latest_run(&self, seed: u64) -> Result<Option<RunRecord>> {
        Ok(self
            .connection
            .query_row(
                "
                select Run_Identity, Seed, Catalog_Fingerprint, Digest, ExpressionCount, GeneratedAt
                    from Run
                    where Seed = ?
                    order by Run_Identity desc
                    limit 1
                ",
                params![seed_to_sql(seed)],
                Self::run_record,
            )
            .optional()?)
    }

    fn run_record(row: &rusqlite::Row) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            run: RunId(row.get(0)?),
            seed: seed_from_sql(row.get(1)?),
            fingerprint: row.get(2)?,
            digest: row.get(3)?,
            expressions: row.get::<_, i64>(4)? as usize,
            generated_at: row.get(5)?,
        })
    }

    /// The rendered expressions of a run, in emission order.
    pub fn restore_run(&self, run: RunId) -> Result<Vec<String>> {
        if self.run(run)?.is_none() {
            return Err(ConcordError::Persistence(format!("unknown {run}")));
        }
        let mut statement = self.connection.prepare(
            "
            select Syntax
                from Expression
                where Run_Identity = ?
                order by Position
            ",
        )?;
        let rows = statement.query_map(params![run.0], |r| r.get::<_, String>(0))?;
        let mut syntax = Vec::new();
        for row in rows {
            syntax.push(row?);
        }
        Ok(syntax)
    }

    pub fn diff_runs(&self, first: RunId, second: RunId) -> Result<RunDiff> {
        let diff = RunDiff::between(&self.restore_run(first)?, &self.restore_run(second)?);
        debug!(
            %first,
            %second,
            only_in_first = diff.only_in_first.len(),
            only_in_second = diff.only_in_second.len(),
            "runs compared"
        );
        Ok(diff)
    }
}
