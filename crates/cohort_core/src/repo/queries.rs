//! Query catalog for the records tables.
//!
//! # Responsibility
//! - Hold every SQL statement the repositories execute, with its bound
//!   parameter order and the result columns callers may read.
//!
//! # Invariants
//! - Parameters are positional (`?1`, `?2`, ...) in the declared order.
//! - Joined selects alias every column with a table prefix so same-named
//!   columns (`study_groups.id` vs `curators.id`) never collide.
//! - Inserts return the generated `id` through `RETURNING`.

/// Declared type of one bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    /// Integer or SQL `NULL`.
    NullableInteger,
    Text,
    /// ISO-8601 `YYYY-MM-DD` text.
    Date,
}

/// A named statement with its parameter and column contract.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub name: &'static str,
    pub sql: &'static str,
    /// Bound parameters in position order.
    pub params: &'static [(&'static str, ParamType)],
    /// Columns exposed by the result; empty for statements without rows.
    pub columns: &'static [&'static str],
}

const GROUP_WITH_CURATOR_COLUMNS: &[&str] = &[
    "group_id",
    "group_name",
    "group_graduation_date",
    "curator_id",
    "curator_name",
    "curator_email",
    "curator_experience",
];
const CURATOR_COLUMNS: &[&str] = &["id", "name", "email", "experience", "group_id"];
const STUDENT_COLUMNS: &[&str] = &["id", "name", "date_of_birth", "group_id"];
const ID_COLUMN: &[&str] = &["id"];

const BY_ID: &[(&str, ParamType)] = &[("id", ParamType::Integer)];
const BY_GROUP_ID: &[(&str, ParamType)] = &[("group_id", ParamType::Integer)];

pub const SELECT_GROUPS_WITH_CURATORS: Query = Query {
    name: "select_groups_with_curators",
    sql: "SELECT
        g.id AS group_id,
        g.name AS group_name,
        g.graduation_date AS group_graduation_date,
        c.id AS curator_id,
        c.name AS curator_name,
        c.email AS curator_email,
        c.experience AS curator_experience
    FROM study_groups g
    LEFT JOIN curators c ON c.group_id = g.id
    ORDER BY g.id ASC;",
    params: &[],
    columns: GROUP_WITH_CURATOR_COLUMNS,
};

pub const SELECT_GROUP_WITH_CURATOR_BY_ID: Query = Query {
    name: "select_group_with_curator_by_id",
    sql: "SELECT
        g.id AS group_id,
        g.name AS group_name,
        g.graduation_date AS group_graduation_date,
        c.id AS curator_id,
        c.name AS curator_name,
        c.email AS curator_email,
        c.experience AS curator_experience
    FROM study_groups g
    LEFT JOIN curators c ON c.group_id = g.id
    WHERE g.id = ?1;",
    params: BY_ID,
    columns: GROUP_WITH_CURATOR_COLUMNS,
};

pub const SELECT_GROUP_ID_BY_NAME: Query = Query {
    name: "select_group_id_by_name",
    sql: "SELECT id FROM study_groups WHERE name = ?1;",
    params: &[("name", ParamType::Text)],
    columns: ID_COLUMN,
};

pub const INSERT_GROUP: Query = Query {
    name: "insert_group",
    sql: "INSERT INTO study_groups (name, graduation_date)
    VALUES (?1, ?2)
    RETURNING id;",
    params: &[("name", ParamType::Text), ("graduation_date", ParamType::Date)],
    columns: ID_COLUMN,
};

pub const UPDATE_GROUP: Query = Query {
    name: "update_group",
    sql: "UPDATE study_groups
    SET name = ?1, graduation_date = ?2
    WHERE id = ?3;",
    params: &[
        ("name", ParamType::Text),
        ("graduation_date", ParamType::Date),
        ("id", ParamType::Integer),
    ],
    columns: &[],
};

pub const DELETE_GROUP_BY_ID: Query = Query {
    name: "delete_group_by_id",
    sql: "DELETE FROM study_groups WHERE id = ?1;",
    params: BY_ID,
    columns: &[],
};

pub const SELECT_CURATOR_BY_ID: Query = Query {
    name: "select_curator_by_id",
    sql: "SELECT id, name, email, experience, group_id
    FROM curators
    WHERE id = ?1;",
    params: BY_ID,
    columns: CURATOR_COLUMNS,
};

pub const SELECT_CURATORS_WITHOUT_GROUP: Query = Query {
    name: "select_curators_without_group",
    sql: "SELECT id, name, email, experience, group_id
    FROM curators
    WHERE group_id IS NULL
    ORDER BY id ASC;",
    params: &[],
    columns: CURATOR_COLUMNS,
};

pub const INSERT_CURATOR: Query = Query {
    name: "insert_curator",
    sql: "INSERT INTO curators (name, email, experience, group_id)
    VALUES (?1, ?2, ?3, ?4)
    RETURNING id;",
    params: &[
        ("name", ParamType::Text),
        ("email", ParamType::Text),
        ("experience", ParamType::Integer),
        ("group_id", ParamType::NullableInteger),
    ],
    columns: ID_COLUMN,
};

pub const UPDATE_CURATOR: Query = Query {
    name: "update_curator",
    sql: "UPDATE curators
    SET name = ?1, email = ?2, experience = ?3, group_id = ?4
    WHERE id = ?5;",
    params: &[
        ("name", ParamType::Text),
        ("email", ParamType::Text),
        ("experience", ParamType::Integer),
        ("group_id", ParamType::NullableInteger),
        ("id", ParamType::Integer),
    ],
    columns: &[],
};

pub const DETACH_CURATORS_BY_GROUP_ID: Query = Query {
    name: "detach_curators_by_group_id",
    sql: "UPDATE curators SET group_id = NULL WHERE group_id = ?1;",
    params: BY_GROUP_ID,
    columns: &[],
};

pub const DELETE_CURATOR_BY_ID: Query = Query {
    name: "delete_curator_by_id",
    sql: "DELETE FROM curators WHERE id = ?1;",
    params: BY_ID,
    columns: &[],
};

pub const SELECT_STUDENT_BY_ID: Query = Query {
    name: "select_student_by_id",
    sql: "SELECT id, name, date_of_birth, group_id
    FROM students
    WHERE id = ?1;",
    params: BY_ID,
    columns: STUDENT_COLUMNS,
};

pub const SELECT_STUDENTS_BY_GROUP_ID: Query = Query {
    name: "select_students_by_group_id",
    sql: "SELECT id, name, date_of_birth, group_id
    FROM students
    WHERE group_id = ?1
    ORDER BY id ASC;",
    params: BY_GROUP_ID,
    columns: STUDENT_COLUMNS,
};

pub const SELECT_STUDENTS_WITHOUT_GROUP: Query = Query {
    name: "select_students_without_group",
    sql: "SELECT id, name, date_of_birth, group_id
    FROM students
    WHERE group_id IS NULL
    ORDER BY id ASC;",
    params: &[],
    columns: STUDENT_COLUMNS,
};

pub const INSERT_STUDENT: Query = Query {
    name: "insert_student",
    sql: "INSERT INTO students (name, date_of_birth, group_id)
    VALUES (?1, ?2, ?3)
    RETURNING id;",
    params: &[
        ("name", ParamType::Text),
        ("date_of_birth", ParamType::Date),
        ("group_id", ParamType::NullableInteger),
    ],
    columns: ID_COLUMN,
};

pub const UPDATE_STUDENT: Query = Query {
    name: "update_student",
    sql: "UPDATE students
    SET name = ?1, date_of_birth = ?2, group_id = ?3
    WHERE id = ?4;",
    params: &[
        ("name", ParamType::Text),
        ("date_of_birth", ParamType::Date),
        ("group_id", ParamType::NullableInteger),
        ("id", ParamType::Integer),
    ],
    columns: &[],
};

pub const DETACH_STUDENTS_BY_GROUP_ID: Query = Query {
    name: "detach_students_by_group_id",
    sql: "UPDATE students SET group_id = NULL WHERE group_id = ?1;",
    params: BY_GROUP_ID,
    columns: &[],
};

pub const DELETE_STUDENT_BY_ID: Query = Query {
    name: "delete_student_by_id",
    sql: "DELETE FROM students WHERE id = ?1;",
    params: BY_ID,
    columns: &[],
};

/// Every statement known to the repositories.
pub const CATALOG: &[Query] = &[
    SELECT_GROUPS_WITH_CURATORS,
    SELECT_GROUP_WITH_CURATOR_BY_ID,
    SELECT_GROUP_ID_BY_NAME,
    INSERT_GROUP,
    UPDATE_GROUP,
    DELETE_GROUP_BY_ID,
    SELECT_CURATOR_BY_ID,
    SELECT_CURATORS_WITHOUT_GROUP,
    INSERT_CURATOR,
    UPDATE_CURATOR,
    DETACH_CURATORS_BY_GROUP_ID,
    DELETE_CURATOR_BY_ID,
    SELECT_STUDENT_BY_ID,
    SELECT_STUDENTS_BY_GROUP_ID,
    SELECT_STUDENTS_WITHOUT_GROUP,
    INSERT_STUDENT,
    UPDATE_STUDENT,
    DETACH_STUDENTS_BY_GROUP_ID,
    DELETE_STUDENT_BY_ID,
];
