// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::MigrationHarness;

use super::{MIGRATIONS, migrated_scratch_store, schema_problems, store_tables};

fn run(conn: &mut SqliteConnection, sql: &str) {
    diesel::sql_query(sql).execute(conn).unwrap();
}

#[test]
fn test_migrated_schema_matches_store_tables() {
    let mut conn = migrated_scratch_store().unwrap();

    let problems = schema_problems(&mut conn).unwrap();

    assert!(problems.is_empty(), "unexpected problems: {problems:?}");
}

#[test]
fn test_reverting_migrations_drops_every_table() {
    let mut conn = migrated_scratch_store().unwrap();
    assert_eq!(store_tables(&mut conn).unwrap().len(), 3);

    conn.revert_all_migrations(MIGRATIONS).unwrap();

    assert!(store_tables(&mut conn).unwrap().is_empty());
}

#[test]
fn test_missing_table_is_reported() {
    let mut conn = migrated_scratch_store().unwrap();
    run(&mut conn, "DROP TABLE ticket_comments");

    let problems = schema_problems(&mut conn).unwrap();

    assert_eq!(problems, vec![String::from("Missing table: ticket_comments")]);
}

#[test]
fn test_drifted_users_table_is_reported() {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    run(
        &mut conn,
        "CREATE TABLE users (
            user_id INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT,
            role TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    );
    run(
        &mut conn,
        "CREATE TABLE tickets (
            ticket_id INTEGER PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL,
            priority TEXT NOT NULL,
            created_by INTEGER NOT NULL REFERENCES users (user_id),
            assigned_to INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            closed_at TEXT
        )",
    );

    let problems = schema_problems(&mut conn).unwrap();

    assert!(problems.contains(&String::from("users.email should have nullable=false")));
    assert!(problems.contains(&String::from("Missing unique constraint on users.email")));
    assert!(problems.contains(&String::from(
        "Missing foreign key: tickets.assigned_to -> users"
    )));
    assert!(problems.contains(&String::from("Missing table: ticket_comments")));
    assert_eq!(problems.len(), 4, "{problems:?}");
}
