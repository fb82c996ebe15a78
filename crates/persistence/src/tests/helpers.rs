// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::{Path, PathBuf};

use mandodesk_domain::{NewTicket, Priority, Role};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::Persistence;

pub const T0: OffsetDateTime = datetime!(2026-02-10 14:30:00.123456 UTC);

/// Directory IDs of the users seeded by `seed_users`.
pub struct TestUsers {
    pub customer: i64,
    pub other_customer: i64,
    pub agent: i64,
    pub other_agent: i64,
    pub admin: i64,
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory store")
}

pub fn seed_users(persistence: &mut Persistence) -> TestUsers {
    TestUsers {
        customer: persistence
            .create_user("Casey Customer", "casey@example.com", Role::Customer)
            .unwrap(),
        other_customer: persistence
            .create_user("Olive Other", "olive@example.com", Role::Customer)
            .unwrap(),
        agent: persistence
            .create_user("Avery Agent", "avery@example.com", Role::Agent)
            .unwrap(),
        other_agent: persistence
            .create_user("Blake Agent", "blake@example.com", Role::Agent)
            .unwrap(),
        admin: persistence
            .create_user("Ada Admin", "ada@example.com", Role::Admin)
            .unwrap(),
    }
}

/// Builds an open, medium-priority ticket created `offset_minutes` after `T0`.
pub fn create_test_new_ticket(created_by: i64, offset_minutes: i64) -> NewTicket {
    NewTicket::new(
        format!("Printer jam #{offset_minutes}"),
        String::from("The office printer eats every second page."),
        Priority::Medium,
        created_by,
        T0 + Duration::minutes(offset_minutes),
    )
}

/// Returns a database path in the temp dir, unique to this process and label.
///
/// Any file left by an earlier run is removed first.
pub fn temp_db_path(label: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "mandodesk_{label}_{}.db",
        std::process::id()
    ));
    remove_db_files(&path);
    path
}

/// Removes a database file along with its WAL side files.
pub fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
