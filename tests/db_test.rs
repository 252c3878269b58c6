mod common;

use std::sync::Arc;

use common::create_test_db;
use quizdesk::{
    authoring::{RecordSource, VocabularyStore},
    db::Db,
    models::{Difficulty, QuestionOption, VocabularyEntry},
    names, reconcile, AuthoringError, Category, Existing, FieldUpdate, QuestionRecord, Session,
    SessionSettings, SubmitOutcome,
};

async fn save(session: &Session<Db>) -> quizdesk::SavedRecord {
    match session.submit().await.expect("submit should succeed") {
        SubmitOutcome::Saved(saved) => saved,
        other => panic!("expected a saved record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_db_connection() {
    let db = create_test_db().await;

    for category in Category::ALL {
        assert!(db.list_for_test(category, "T1").await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_multiple_choice_create_and_reload() {
    let db = Arc::new(create_test_db().await);
    let session = Session::new(
        SessionSettings::new(Category::MultipleChoice, "T1"),
        Arc::clone(&db),
    );
    session.open(None).await.unwrap();
    session
        .set_field(FieldUpdate::QuestionText("Largest planet?".into()))
        .unwrap();
    session.set_option_text(1, "Jupiter").unwrap();
    session.set_option_text(2, "Mars").unwrap();
    session.toggle_correct_answer("B").unwrap();
    session.set_incorrect_explanation("C", "Mars is smaller than Earth").unwrap();
    session
        .set_field(FieldUpdate::Tags(vec!["astronomy".into()]))
        .unwrap();

    let saved = save(&session).await;

    let QuestionRecord::MultipleChoice(q) = &saved.record else {
        panic!("expected multiple choice");
    };
    assert_eq!(
        q.options,
        vec![
            QuestionOption { label: "B".into(), text: "Jupiter".into() },
            QuestionOption { label: "C".into(), text: "Mars".into() },
        ]
    );
    assert_eq!(db.get_saved(Category::MultipleChoice, saved.id).await.unwrap(), saved);

    let raw = db.fetch_raw(Category::MultipleChoice, saved.id).await.unwrap();
    let working = reconcile(Category::MultipleChoice, "T1", Some(&raw));
    assert_eq!(working, saved.record);
}

#[tokio::test]
async fn test_vocabulary_update_keeps_id() {
    let db = Arc::new(create_test_db().await);

    let create = Session::new(SessionSettings::new(Category::Vocabulary, "T1"), Arc::clone(&db));
    create.open(None).await.unwrap();
    create.set_field(FieldUpdate::Word("apple".into())).unwrap();
    create.set_field(FieldUpdate::Meaning("quả táo".into())).unwrap();
    let created = save(&create).await;

    let edit = Session::new(SessionSettings::new(Category::Vocabulary, "T1"), Arc::clone(&db));
    edit.open(Some(Existing::Fetch { id: created.id })).await.unwrap();
    edit.set_field(FieldUpdate::WordClass(Some("noun".into()))).unwrap();
    edit.set_field(FieldUpdate::Difficulty(Difficulty::Easy)).unwrap();
    let updated = save(&edit).await;

    assert_eq!(updated.id, created.id);
    let listed = db.list_for_test(Category::Vocabulary, "T1").await.unwrap();
    assert_eq!(listed, vec![updated.clone()]);
    let QuestionRecord::Vocabulary(entry) = updated.record else {
        panic!("expected vocabulary");
    };
    assert_eq!(entry.word, "apple");
    assert_eq!(entry.word_class.as_deref(), Some("noun"));
    assert_eq!(entry.difficulty, Difficulty::Easy);
}

#[tokio::test]
async fn test_grammar_requires_admin_session() {
    let db = Arc::new(create_test_db().await);

    let open = |bearer: &str| {
        let settings = SessionSettings::new(Category::Grammar, "T2").with_bearer(bearer);
        Session::new(settings, Arc::clone(&db))
    };

    let rejected = open("not-a-session");
    rejected.open(None).await.unwrap();
    rejected
        .set_field(FieldUpdate::QuestionText("I ___ to school.".into()))
        .unwrap();
    rejected.set_field(FieldUpdate::CorrectAnswer("go".into())).unwrap();
    assert_eq!(
        rejected.submit().await.unwrap_err(),
        AuthoringError::Persistence(names::SAVE_FAILED_MESSAGE.into())
    );

    let token = db.create_admin_session().await.unwrap();
    let accepted = open(token.as_str());
    accepted.open(None).await.unwrap();
    accepted
        .set_field(FieldUpdate::QuestionText("I ___ to school.".into()))
        .unwrap();
    accepted.set_field(FieldUpdate::CorrectAnswer("go".into())).unwrap();
    let saved = save(&accepted).await;

    let QuestionRecord::Grammar(g) = saved.record else {
        panic!("expected grammar");
    };
    assert_eq!(g.alternative_answers, ["", "", ""]);
    assert_eq!(g.points, 1);
    assert_eq!(db.list_for_test(Category::Grammar, "T2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_of_missing_record_fails() {
    let db = create_test_db().await;
    let entry = VocabularyEntry {
        word: "ghost".into(),
        meaning: "ma".into(),
        example_sentence: String::new(),
        word_class: None,
        difficulty: Difficulty::Medium,
        test_id: "T1".into(),
    };

    assert!(db.update_vocabulary(999, &entry).await.is_err());
    assert!(db.fetch_raw(Category::Vocabulary, 999).await.is_err());
}

#[tokio::test]
async fn test_records_are_listed_per_test() {
    let db = create_test_db().await;
    let entry = |word: &str, test_id: &str| VocabularyEntry {
        word: word.into(),
        meaning: "m".into(),
        example_sentence: String::new(),
        word_class: None,
        difficulty: Difficulty::Hard,
        test_id: test_id.into(),
    };

    db.create_vocabulary(&entry("one", "T1")).await.unwrap();
    db.create_vocabulary(&entry("two", "T2")).await.unwrap();
    db.create_vocabulary(&entry("three", "T1")).await.unwrap();

    let words: Vec<String> = db
        .list_for_test(Category::Vocabulary, "T1")
        .await
        .unwrap()
        .into_iter()
        .map(|saved| match saved.record {
            QuestionRecord::Vocabulary(v) => v.word,
            other => panic!("expected vocabulary, got {other:?}"),
        })
        .collect();
    assert_eq!(words, ["one", "three"]);
}
