use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// One schema step. Applied steps are recorded in the `log` table as
/// `migration_applied` rows and never run twice.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_initial_schema",
        description: "Created students, attendance and notifications tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS students (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            id_number      TEXT NOT NULL UNIQUE,
            name           TEXT NOT NULL,
            class          TEXT NOT NULL,
            parent_name    TEXT NOT NULL,
            parent_contact TEXT NOT NULL,
            parent_email   TEXT NOT NULL DEFAULT '',
            parent_address TEXT NOT NULL DEFAULT '',
            photo          TEXT,
            qr_value       TEXT,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id   TEXT NOT NULL,
            student_name TEXT NOT NULL,
            direction    TEXT NOT NULL CHECK(direction IN ('IN','OUT')),
            timestamp    TEXT NOT NULL,
            location     TEXT NOT NULL,
            scanner      TEXT NOT NULL CHECK(scanner IN ('bus','school')),
            recorded_by  TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_student ON attendance(student_id);

        CREATE TABLE IF NOT EXISTS notifications (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id     TEXT NOT NULL,
            student_name   TEXT NOT NULL,
            parent_name    TEXT NOT NULL DEFAULT '',
            parent_email   TEXT NOT NULL DEFAULT '',
            parent_contact TEXT NOT NULL DEFAULT '',
            message        TEXT NOT NULL,
            kind           TEXT NOT NULL,
            direction      TEXT NOT NULL CHECK(direction IN ('IN','OUT')),
            location       TEXT NOT NULL DEFAULT '',
            status         TEXT NOT NULL DEFAULT 'sent',
            is_read        INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250915_0002_leave_applications",
        description: "Created leave_applications table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS leave_applications (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name  TEXT NOT NULL,
            student_class TEXT NOT NULL,
            roll          TEXT NOT NULL,
            reason        TEXT NOT NULL,
            from_date     TEXT NOT NULL,
            to_date       TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'Pending'
                          CHECK(status IN ('Pending','Approved','Disapproved')),
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_leave_roll ON leave_applications(roll);
        "#,
    },
    Migration {
        version: "20251002_0003_scan_memo",
        description: "Created scan_memo table and parent lookup index",
        sql: r#"
        CREATE TABLE IF NOT EXISTS scan_memo (
            station     TEXT NOT NULL,
            student_id  TEXT NOT NULL,
            direction   TEXT NOT NULL CHECK(direction IN ('IN','OUT')),
            resolved_at TEXT NOT NULL,
            PRIMARY KEY (station, student_id)
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_parent ON notifications(parent_email);
        "#,
    },
    Migration {
        version: "20251020_0004_buses_and_schedules",
        description: "Created buses and bus_schedules, linked students to buses, \
                      allowed notifications without a direction",
        sql: r#"
        CREATE TABLE IF NOT EXISTS buses (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL UNIQUE,
            driver_name    TEXT NOT NULL,
            driver_contact TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bus_schedules (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            bus_id     INTEGER NOT NULL REFERENCES buses(id),
            date       TEXT NOT NULL,
            time       TEXT NOT NULL,
            info       TEXT NOT NULL DEFAULT '',
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_schedules_bus_date ON bus_schedules(bus_id, date);

        ALTER TABLE students ADD COLUMN bus_id INTEGER REFERENCES buses(id);

        CREATE TABLE notifications_v4 (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id     TEXT NOT NULL,
            student_name   TEXT NOT NULL,
            parent_name    TEXT NOT NULL DEFAULT '',
            parent_email   TEXT NOT NULL DEFAULT '',
            parent_contact TEXT NOT NULL DEFAULT '',
            message        TEXT NOT NULL,
            kind           TEXT NOT NULL,
            direction      TEXT CHECK(direction IS NULL OR direction IN ('IN','OUT')),
            location       TEXT NOT NULL DEFAULT '',
            status         TEXT NOT NULL DEFAULT 'sent',
            is_read        INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL
        );

        INSERT INTO notifications_v4
        SELECT id, student_id, student_name, parent_name, parent_email, parent_contact,
               message, kind, direction, location, status, is_read, created_at
        FROM notifications;

        DROP TABLE notifications;
        ALTER TABLE notifications_v4 RENAME TO notifications;

        CREATE INDEX IF NOT EXISTS idx_notifications_parent ON notifications(parent_email);
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                 AND name IN ('students','attendance','notifications','leave_applications',
                              'scan_memo','buses','bus_schedules')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 7);
    }

    #[test]
    fn notifications_survive_direction_relaxation() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        for m in &MIGRATIONS[..3] {
            apply(&conn, m).unwrap();
        }
        conn.execute(
            "INSERT INTO notifications (student_id, student_name, message, kind, direction, created_at)
             VALUES ('STD001', 'Ana', 'marked IN', 'bus', 'IN', '2025-10-01T07:00:00.000Z')",
            [],
        )
        .unwrap();

        assert_eq!(run_pending_migrations(&conn).unwrap(), 1);

        let dir: Option<String> = conn
            .query_row("SELECT direction FROM notifications WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(dir.as_deref(), Some("IN"));

        conn.execute(
            "INSERT INTO notifications (student_id, student_name, message, kind, created_at)
             VALUES ('STD001', 'Ana', 'Bus schedule updated', 'schedule', '2025-10-02T07:00:00.000Z')",
            [],
        )
        .unwrap();
        assert!(
            conn.execute(
                "INSERT INTO notifications (student_id, student_name, message, kind, direction, created_at)
                 VALUES ('STD001', 'Ana', 'x', 'bus', 'SIDEWAYS', '2025-10-02T07:00:00.000Z')",
                [],
            )
            .is_err()
        );
    }
}
