mod common;

use common::{
    curator_group_fk, insert_curator_row, insert_group_row, row_count, sample_group,
    student_group_fk,
};
use cohort_core::{
    ConnectionProvider, Curator, CuratorRepository, GroupRepository, RepoError,
    SqliteCuratorRepository, SqliteGroupRepository,
};

#[test]
fn unassigned_curator_saves_directly() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let saved = curators.save(Curator::new("C9", "c9@x", 12)).unwrap();
    let id = saved.id.unwrap();
    assert_eq!(saved.group_id, None);

    let loaded = curators.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(curator_group_fk(&provider, id), Some(None));
}

#[test]
fn updating_an_unassigned_curator_changes_scalars_only() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let mut curator = curators.save(Curator::new("C9", "c9@x", 12)).unwrap();
    curator.experience = 13;
    curator.email = "c9@y".to_string();
    curators.save(curator.clone()).unwrap();

    let loaded = curators.find_by_id(curator.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.experience, 13);
    assert_eq!(loaded.email, "c9@y");
    assert_eq!(row_count(&provider, "curators"), 1);
}

#[test]
fn grouped_curator_save_cascades_through_the_whole_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let group_id = group.id.unwrap();
    let previous_id = group.curator.as_ref().unwrap().id.unwrap();

    let mut replacement = Curator::new("C2", "c2@x", 4);
    replacement.group_id = Some(group_id);
    let saved = curators.save(replacement).unwrap();
    assert_eq!(saved.group_id, Some(group_id));

    let reloaded = groups.find_by_id(group_id).unwrap().unwrap();
    assert_eq!(reloaded.curator.as_ref(), Some(&saved));
    assert_eq!(reloaded.students.len(), 2);
    assert_eq!(curator_group_fk(&provider, previous_id), Some(None));
    for student in &reloaded.students {
        assert_eq!(
            student_group_fk(&provider, student.id.unwrap()),
            Some(Some(group_id))
        );
    }
}

#[test]
fn saving_the_current_curator_updates_it_in_place() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let mut curator = group.curator.unwrap();
    curator.experience = 10;
    let saved = curators.save(curator.clone()).unwrap();

    assert_eq!(saved, curator);
    assert_eq!(row_count(&provider, "curators"), 1);
    assert_eq!(curators.find_by_id(curator.id.unwrap()).unwrap(), Some(curator));
}

#[test]
fn saving_into_an_unknown_group_is_an_argument_error() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let mut curator = Curator::new("C1", "c1@x", 1);
    curator.group_id = Some(404);
    let err = curators.save(curator).unwrap_err();
    assert!(matches!(err, RepoError::InvalidArgument(_)));
    assert_eq!(row_count(&provider, "curators"), 0);
}

#[test]
fn find_by_id_of_grouped_curator_comes_from_its_group() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let expected = group.curator.clone().unwrap();

    let loaded = curators.find_by_id(expected.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, expected);
    assert_eq!(loaded.group_id, group.id);
    assert!(curators.find_by_id(404).unwrap().is_none());
}

#[test]
fn find_all_lists_unassigned_then_grouped() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let loose = insert_curator_row(&provider, "loose", None);
    insert_group_row(&provider, "empty");

    let all: Vec<Curator> = curators.find_all().unwrap().collect();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, Some(loose));
    assert_eq!(all[0].group_id, None);
    assert_eq!(Some(&all[1]), group.curator.as_ref());
}

#[test]
fn remove_by_id_deletes_only_the_curator_row() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let curator_id = group.curator.as_ref().unwrap().id.unwrap();

    let removed = curators.remove_by_id(curator_id).unwrap().unwrap();
    assert_eq!(Some(&removed), group.curator.as_ref());
    assert!(curators.remove_by_id(curator_id).unwrap().is_none());

    let reloaded = groups.find_by_id(group.id.unwrap()).unwrap().unwrap();
    assert!(reloaded.curator.is_none());
    assert_eq!(reloaded.students.len(), 2);
}

#[test]
fn curator_outlives_its_removed_group_unassigned() {
    let provider = ConnectionProvider::in_memory().unwrap();
    let groups = SqliteGroupRepository::new(&provider);
    let curators = SqliteCuratorRepository::new(&provider, &groups);

    let group = groups.save(sample_group()).unwrap();
    let curator_id = group.curator.as_ref().unwrap().id.unwrap();
    groups.remove_by_id(group.id.unwrap()).unwrap().unwrap();

    let loaded = curators.find_by_id(curator_id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(curator_id));
    assert_eq!(loaded.name, "C1");
    assert_eq!(loaded.group_id, None);
}
