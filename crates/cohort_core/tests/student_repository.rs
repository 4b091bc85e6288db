mod common;

use common::{date, insert_group_row, insert_student_row, row_count, sample_group, student_group_fk};
use cohort_core::{
    ConnectionProvider, GroupRepository, RepoError, SqliteGroupRepository,
    SqliteStudentRepository, Student, StudentRepository,
};

#[test]
fn unassigned_student_saves_directly() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let saved = students
        .save(Student::new("S9", date(2005, 3, 14)))
        .unwrap();
    let id = saved.id.unwrap();

    let loaded = students.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.date_of_birth, date(2005, 3, 14));
    assert_eq!(student_group_fk(&provider, id), Some(None));
}

#[test]
fn enrolling_a_new_student_saves_the_whole_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let group_id = group.id.unwrap();

    let mut newcomer = Student::new("S3", date(2004, 12, 1));
    newcomer.group_id = Some(group_id);
    let saved = students.save(newcomer).unwrap();
    assert_eq!(saved.name, "S3");
    assert_eq!(saved.group_id, Some(group_id));

    let reloaded = groups.find_by_id(group_id).unwrap().unwrap();
    assert_eq!(reloaded.students.len(), 3);
    assert_eq!(reloaded.student(saved.id.unwrap()), Some(&saved));
    assert!(reloaded.is_consistent());
}

#[test]
fn enrolling_an_existing_loose_student_moves_it_into_the_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let group_id = group.id.unwrap();
    let loose = insert_student_row(&provider, "loose", None);

    let mut student = students.find_by_id(loose).unwrap().unwrap();
    student.group_id = Some(group_id);
    let saved = students.save(student).unwrap();

    assert_eq!(saved.id, Some(loose));
    assert_eq!(student_group_fk(&provider, loose), Some(Some(group_id)));
    assert_eq!(row_count(&provider, "students"), 3);
}

#[test]
fn resaving_an_enrolled_student_replaces_it_in_the_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let mut student = group.students[0].clone();
    student.name = "S1 renamed".to_string();
    let saved = students.save(student.clone()).unwrap();
    assert_eq!(saved, student);

    let reloaded = groups.find_by_id(group.id.unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.students.len(), 2);
    assert_eq!(
        reloaded.student(student.id.unwrap()).map(|item| item.name.as_str()),
        Some("S1 renamed")
    );
}

#[test]
fn unassigning_a_student_through_its_own_save() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let mut student = group.students[1].clone();
    student.group_id = None;
    students.save(student.clone()).unwrap();

    assert_eq!(student_group_fk(&provider, student.id.unwrap()), Some(None));
    let reloaded = groups.find_by_id(group.id.unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.students.len(), 1);
}

#[test]
fn saving_into_an_unknown_group_is_an_argument_error() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let mut student = Student::new("S1", date(2004, 1, 1));
    student.group_id = Some(404);
    let err = students.save(student).unwrap_err();
    assert!(matches!(err, RepoError::InvalidArgument(_)));
    assert_eq!(row_count(&provider, "students"), 0);
}

#[test]
fn find_by_id_of_grouped_student_comes_from_its_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let expected = group.students[1].clone();

    let loaded = students.find_by_id(expected.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, expected);
    assert!(students.find_by_id(404).unwrap().is_none());
}

#[test]
fn find_all_lists_unassigned_then_each_groups_students() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    insert_group_row(&provider, "empty");
    let loose = insert_student_row(&provider, "loose", None);

    let all: Vec<Student> = students.find_all().unwrap().collect();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, Some(loose));
    assert_eq!(&all[1..], group.students.as_slice());
}

#[test]
fn remove_by_id_deletes_only_the_student_row() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let student_id = group.students[0].id.unwrap();

    let removed = students.remove_by_id(student_id).unwrap().unwrap();
    assert_eq!(removed, group.students[0]);
    assert!(students.remove_by_id(student_id).unwrap().is_none());
    assert_eq!(student_group_fk(&provider, student_id), None);

    let reloaded = groups.find_by_id(group.id.unwrap()).unwrap().unwrap();
    assert_eq!(reloaded.students.len(), 1);
    assert!(reloaded.curator.is_some());
}

#[test]
fn student_outlives_its_removed_group_unassigned() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let students = SqliteStudentRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let student_id = group.students[0].id.unwrap();
    groups.remove_by_id(group.id.unwrap()).unwrap().unwrap();

    let loaded = students.find_by_id(student_id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(student_id));
    assert_eq!(loaded.name, "S1");
    assert_eq!(loaded.group_id, None);
}
