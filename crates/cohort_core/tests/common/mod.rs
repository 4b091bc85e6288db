#![allow(dead_code)]

use chrono::NaiveDate;
use cohort_core::{ConnectionProvider, Curator, Group, Student};
use rusqlite::{params, OptionalExtension};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Unsaved G1 with curator C1 and students S1, S2.
pub fn sample_group() -> Group {
    let mut group = Group::new("G1", date(2025, 6, 1));
    group.set_curator(Some(Curator::new("C1", "c1@x", 3)));
    group.add_student(Student::new("S1", date(2004, 2, 11)));
    group.add_student(Student::new("S2", date(2004, 9, 30)));
    group
}

pub fn insert_group_row(provider: &ConnectionProvider, name: &str) -> i64 {
    let conn = provider.acquire().unwrap();
    conn.query_row(
        "INSERT INTO study_groups (name, graduation_date) VALUES (?1, ?2) RETURNING id",
        params![name, date(2026, 6, 30)],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn insert_curator_row(provider: &ConnectionProvider, name: &str, group_id: Option<i64>) -> i64 {
    let conn = provider.acquire().unwrap();
    conn.query_row(
        "INSERT INTO curators (name, email, experience, group_id) VALUES (?1, ?2, 5, ?3) RETURNING id",
        params![name, format!("{name}@x"), group_id],
        |row| row.get(0),
    )
    .unwrap()
}

pub fn insert_student_row(provider: &ConnectionProvider, name: &str, group_id: Option<i64>) -> i64 {
    let conn = provider.acquire().unwrap();
    conn.query_row(
        "INSERT INTO students (name, date_of_birth, group_id) VALUES (?1, ?2, ?3) RETURNING id",
        params![name, date(2003, 1, 1), group_id],
        |row| row.get(0),
    )
    .unwrap()
}

/// Stored FK of a curator row; outer `None` when the row is gone.
pub fn curator_group_fk(provider: &ConnectionProvider, id: i64) -> Option<Option<i64>> {
    let conn = provider.acquire().unwrap();
    conn.query_row("SELECT group_id FROM curators WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .optional()
    .unwrap()
}

/// Stored FK of a student row; outer `None` when the row is gone.
pub fn student_group_fk(provider: &ConnectionProvider, id: i64) -> Option<Option<i64>> {
    let conn = provider.acquire().unwrap();
    conn.query_row("SELECT group_id FROM students WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .optional()
    .unwrap()
}

pub fn row_count(provider: &ConnectionProvider, table: &str) -> i64 {
    let conn = provider.acquire().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

/// Every row of the three tables rendered as text, in id order.
pub fn dump_tables(provider: &ConnectionProvider) -> Vec<String> {
    let conn = provider.acquire().unwrap();
    let mut lines = Vec::new();
    for sql in [
        "SELECT 'g', id, name, graduation_date, NULL, NULL FROM study_groups ORDER BY id",
        "SELECT 'c', id, name, email, experience, group_id FROM curators ORDER BY id",
        "SELECT 's', id, name, date_of_birth, NULL, group_id FROM students ORDER BY id",
    ] {
        let mut stmt = conn.prepare(sql).unwrap();
        let rows = stmt
            .query_map([], |row| {
                Ok(format!(
                    "{}|{}|{}|{}|{:?}|{:?}",
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                ))
            })
            .unwrap();
        for row in rows {
            lines.push(row.unwrap());
        }
    }
    lines
}
