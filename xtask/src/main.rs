// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations CI runs so they can be repeated locally.
//!
//! - `cargo xtask ci` runs lint, unused-dependency checks, build, tests
//!   and migration verification in order
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to an
//!   in-memory database and checks the resulting schema against the tables
//!   the ticket store expects, then reverts them
//! - `cargo xtask serve` starts the server with the demo users seeded

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::{io, process::Output};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

/// The server binary package.
const SERVER_PACKAGE: &str = "mandodesk-server";

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, machete, build, test, migrations)
    CI,

    /// Build every crate and target
    #[command(visible_alias = "b")]
    Build,

    /// Type-check every crate and target
    #[command(visible_alias = "c")]
    Check,

    /// Find dependencies no crate uses
    #[command(visible_alias = "m")]
    Machete,

    /// Run clippy, rustdoc, and rustfmt checks
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy with warnings denied
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Build the docs of each crate with warnings denied
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check formatting without rewriting files
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Apply clippy suggestions
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Rewrite files with rustfmt
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run lib tests then doc tests
    #[command(visible_alias = "t")]
    Test,

    /// Run doc tests
    #[command(visible_alias = "td")]
    TestDocs,

    /// Run lib, bin, and router tests
    #[command(visible_alias = "tl")]
    TestLibs,

    /// Apply, inspect, and revert the `SQLite` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,

    /// Start the server with the demo users seeded
    #[command(visible_alias = "s")]
    Serve {
        /// `SQLite` file to use; in-memory when omitted
        #[arg(short, long)]
        database: Option<String>,

        /// Port to listen on
        #[arg(short, long, default_value_t = 4000)]
        port: u16,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixClippy => fix_clippy(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestDocs => test_docs(),
            Self::TestLibs => test_libs(),
            Self::VerifyMigrations => verify_migrations(),
            Self::Serve { database, port } => serve(database.as_deref(), port),
        }
    }
}

fn ci() -> Result<()> {
    lint()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

fn build() -> Result<()> {
    run_cargo(&["build", "--workspace", "--all-targets"])
}

fn check() -> Result<()> {
    run_cargo(&["check", "--workspace", "--all-targets"])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

fn lint_clippy() -> Result<()> {
    run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn fix_clippy() -> Result<()> {
    run_cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--fix",
        "--allow-dirty",
        "--allow-staged",
        "--",
        "-D",
        "warnings",
    ])
}

/// Build rustdoc for each default member so a broken intra-doc link in one
/// crate is reported against that crate.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd("cargo", ["doc", "--no-deps", "--package", &package.name])
            .env("RUSTDOCFLAGS", "-D warnings")
            .run_with_trace()?;
    }

    Ok(())
}

fn lint_format() -> Result<()> {
    run_cargo(&["fmt", "--all", "--check"])
}

fn fix_format() -> Result<()> {
    run_cargo(&["fmt", "--all"])
}

fn test() -> Result<()> {
    test_libs()?;
    test_docs()?; // run last because it's slow
    Ok(())
}

fn test_docs() -> Result<()> {
    run_cargo(&["test", "--workspace", "--doc"])
}

fn test_libs() -> Result<()> {
    run_cargo(&["test", "--workspace", "--all-targets"])
}

/// Run the server in the foreground until it is interrupted.
fn serve(database: Option<&str>, port: u16) -> Result<()> {
    let port: String = port.to_string();
    let mut args: Vec<&str> = vec![
        "run",
        "--package",
        SERVER_PACKAGE,
        "--",
        "--seed-demo-users",
        "--port",
        &port,
    ];
    if let Some(database) = database {
        args.extend(["--database", database]);
    }
    run_cargo(&args)
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Ticket store migrations, applied from source so a change is checked
/// before the persistence crate is rebuilt.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

/// Apply the ticket store migrations to a scratch database and check them.
///
/// The migrated tables must match what the store reads and writes. Reverting
/// every migration must leave no table behind.
fn verify_migrations() -> Result<()> {
    tracing::info!("Applying SQLite migrations");
    let mut conn = migrated_scratch_store()?;

    let problems = schema_problems(&mut conn)?;
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!("  {problem}");
        }
        return Err(eyre!(
            "Schema verification failed with {} problem(s)",
            problems.len()
        ));
    }
    tracing::info!("Schema matches the ticket store tables");

    tracing::info!("Reverting SQLite migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to revert SQLite migrations: {e}"))?;

    let leftover = store_tables(&mut conn)?;
    if !leftover.is_empty() {
        return Err(eyre!(
            "Tables left behind after reverting migrations: {leftover:?}"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// An in-memory database with foreign keys on and every migration applied.
fn migrated_scratch_store() -> Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;
    Ok(conn)
}

/// A store column: `(name, declared type, nullable)`. The first column of
/// each table is its primary key.
type StoreColumn = (&'static str, &'static str, bool);

const USERS: &[StoreColumn] = &[
    ("user_id", "INTEGER", false),
    ("name", "TEXT", false),
    ("email", "TEXT", false),
    ("role", "TEXT", false),
    ("created_at", "TEXT", false),
];

const TICKETS: &[StoreColumn] = &[
    ("ticket_id", "INTEGER", false),
    ("title", "TEXT", false),
    ("description", "TEXT", false),
    ("status", "TEXT", false),
    ("priority", "TEXT", false),
    ("created_by", "INTEGER", false),
    ("assigned_to", "INTEGER", true),
    ("created_at", "TEXT", false),
    ("updated_at", "TEXT", false),
    ("closed_at", "TEXT", true),
];

const TICKET_COMMENTS: &[StoreColumn] = &[
    ("comment_id", "INTEGER", false),
    ("ticket_id", "INTEGER", false),
    ("author_id", "INTEGER", false),
    ("message", "TEXT", false),
    ("created_at", "TEXT", false),
];

const STORE_TABLES: [(&str, &[StoreColumn]); 3] = [
    ("users", USERS),
    ("tickets", TICKETS),
    ("ticket_comments", TICKET_COMMENTS),
];

/// `(table, column, referenced table)`
const REFERENCES: [(&str, &str, &str); 4] = [
    ("tickets", "created_by", "users"),
    ("tickets", "assigned_to", "users"),
    ("ticket_comments", "ticket_id", "tickets"),
    ("ticket_comments", "author_id", "users"),
];

/// Single-column UNIQUE constraints, as `(table, column)`.
const UNIQUE_COLUMNS: [(&str, &str); 1] = [("users", "email")];

/// What `SQLite` reports about one table.
#[derive(Debug, Default)]
struct TableShape {
    /// Column name to `(upper-cased type, nullable, part of primary key)`.
    columns: BTreeMap<String, (String, bool, bool)>,
    /// `(column, referenced table)`
    references: BTreeSet<(String, String)>,
    /// Column lists of UNIQUE constraints.
    unique: BTreeSet<Vec<String>>,
}

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct ReferenceRow {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
}

#[derive(QueryableByName)]
struct IndexRow {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    origin: String,
}

/// Names of the tables created by migrations.
fn store_tables(conn: &mut SqliteConnection) -> Result<BTreeSet<String>> {
    let rows: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations'",
    )
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

fn inspect_table(conn: &mut SqliteConnection, table: &str) -> Result<TableShape> {
    let mut shape = TableShape::default();

    let columns: Vec<ColumnRow> = diesel::sql_query(format!("PRAGMA table_info({table})"))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of {table}"))?;
    for column in columns {
        shape.columns.insert(
            column.name,
            (column.r#type.to_uppercase(), column.notnull == 0, column.pk > 0),
        );
    }

    let references: Vec<ReferenceRow> =
        diesel::sql_query(format!("PRAGMA foreign_key_list({table})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read foreign keys of {table}"))?;
    shape.references = references
        .into_iter()
        .map(|reference| (reference.from, reference.table))
        .collect();

    let indexes: Vec<IndexRow> = diesel::sql_query(format!("PRAGMA index_list({table})"))
        .load(conn)
        .wrap_err_with(|| format!("Failed to read indexes of {table}"))?;
    // origin 'u' is a UNIQUE constraint; plain CREATE INDEX is 'c'
    for index in indexes.into_iter().filter(|index| index.origin == "u") {
        let indexed: Vec<NameRow> = diesel::sql_query(format!("PRAGMA index_info({})", index.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read index {}", index.name))?;
        shape
            .unique
            .insert(indexed.into_iter().map(|row| row.name).collect());
    }

    Ok(shape)
}

/// Every way the migrated schema differs from what the ticket store uses.
fn schema_problems(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let present = store_tables(conn)?;
    let mut shapes: BTreeMap<&str, TableShape> = BTreeMap::new();
    let mut problems: Vec<String> = Vec::new();

    for (table, columns) in STORE_TABLES {
        if !present.contains(table) {
            problems.push(format!("Missing table: {table}"));
            continue;
        }
        let shape = inspect_table(conn, table)?;

        for (index, (column, expected_type, nullable)) in columns.iter().enumerate() {
            let Some((found_type, found_nullable, primary)) = shape.columns.get(*column) else {
                problems.push(format!("Missing column: {table}.{column}"));
                continue;
            };
            if found_type != expected_type {
                problems.push(format!(
                    "{table}.{column} is {found_type}, expected {expected_type}"
                ));
            }
            if found_nullable != nullable {
                problems.push(format!("{table}.{column} should have nullable={nullable}"));
            }
            if *primary != (index == 0) {
                problems.push(format!("{table}.{column} has the wrong primary key flag"));
            }
        }
        shapes.insert(table, shape);
    }

    for (table, column, referenced) in REFERENCES {
        let wanted = (column.to_string(), referenced.to_string());
        if shapes
            .get(table)
            .is_some_and(|shape| !shape.references.contains(&wanted))
        {
            problems.push(format!("Missing foreign key: {table}.{column} -> {referenced}"));
        }
    }

    for (table, column) in UNIQUE_COLUMNS {
        let wanted = vec![column.to_string()];
        if shapes
            .get(table)
            .is_some_and(|shape| !shape.unique.contains(&wanted))
        {
            problems.push(format!("Missing unique constraint on {table}.{column}"));
        }
    }

    Ok(problems)
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}

#[cfg(test)]
mod tests;
