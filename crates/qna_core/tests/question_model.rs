use qna_core::{Answer, ContentType, QnaError, Question, SoftDelete, User};
use uuid::Uuid;

fn javajigi() -> User {
    User::new("javajigi", "password", "name", "javajigi@slipp.net")
}

fn sanjigi() -> User {
    User::new("sanjigi", "password", "name", "sanjigi@slipp.net")
}

fn question_by(writer: &User) -> Question {
    Question::new("title1", "contents1")
        .write_by(Some(writer))
        .unwrap()
}

fn attach(question: &mut Question, writer: &User, contents: &str) -> Uuid {
    let answer = Answer::new(Some(writer), Some(&*question), contents).unwrap();
    let id = answer.id();
    question.add_answer(answer).unwrap();
    id
}

fn deleted_flags(question: &Question) -> Vec<bool> {
    question
        .all_answers()
        .iter()
        .map(|answer| answer.is_deleted())
        .collect()
}

#[test]
fn new_question_is_an_unowned_live_draft() {
    let question = Question::new("title", "contents");

    assert!(!question.id().is_nil());
    assert_eq!(question.title(), "title");
    assert_eq!(question.contents(), "contents");
    assert!(question.writer().is_none());
    assert!(!question.is_deleted());
    assert_eq!(question.answers().count(), 0);
}

#[test]
fn write_by_requires_a_writer() {
    let err = Question::new("title", "contents").write_by(None).unwrap_err();
    assert!(matches!(err, QnaError::InvalidArgument(_)));

    let alice = javajigi();
    let question = question_by(&alice);
    assert_eq!(question.writer(), Some(&alice));
    assert!(question.is_owner(&alice));
    assert!(!question.is_owner(&sanjigi()));
}

#[test]
fn answer_new_requires_writer_and_question() {
    let alice = javajigi();
    let question = question_by(&alice);

    let missing_writer = Answer::new(None, Some(&question), "x").unwrap_err();
    assert!(matches!(missing_writer, QnaError::InvalidArgument(_)));

    let missing_question = Answer::new(Some(&alice), None, "x").unwrap_err();
    assert!(matches!(missing_question, QnaError::InvalidArgument(_)));

    let answer = Answer::new(Some(&alice), Some(&question), "x").unwrap();
    assert_eq!(answer.question_id(), question.id());
    assert_eq!(answer.writer(), &alice);
    assert_eq!(answer.contents(), "x");
    assert!(!answer.is_deleted());
}

#[test]
fn mark_deleted_is_idempotent() {
    let alice = javajigi();
    let question = question_by(&alice);
    let mut answer = Answer::new(Some(&alice), Some(&question), "x").unwrap();

    answer.mark_deleted();
    answer.mark_deleted();
    assert!(answer.is_deleted());
}

#[test]
fn add_answer_rejects_answer_of_another_question() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    let other = question_by(&alice);
    let foreign = Answer::new(Some(&alice), Some(&other), "elsewhere").unwrap();

    let err = question.add_answer(foreign).unwrap_err();
    assert!(matches!(err, QnaError::InvalidArgument(_)));
    assert!(question.all_answers().is_empty());
}

#[test]
fn add_answer_rejects_duplicate_attachment() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    let answer = Answer::new(Some(&alice), Some(&question), "x").unwrap();

    question.add_answer(answer.clone()).unwrap();
    let err = question.add_answer(answer).unwrap_err();
    assert!(matches!(err, QnaError::InvalidArgument(_)));
    assert_eq!(question.all_answers().len(), 1);
}

#[test]
fn delete_answer_hides_it_from_answers() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    let a1 = attach(&mut question, &alice, "x");
    let a2 = attach(&mut question, &alice, "y");

    question.delete_answer(a2).unwrap();

    let visible: Vec<Uuid> = question.answers().map(|answer| answer.id()).collect();
    assert_eq!(visible, vec![a1]);
    assert!(question.find_answer(a2).unwrap().is_deleted());
    assert_eq!(question.all_answers().len(), 2);
}

#[test]
fn delete_answer_of_unknown_id_is_not_found() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    attach(&mut question, &alice, "x");

    let missing = Uuid::new_v4();
    assert_eq!(
        question.delete_answer(missing).unwrap_err(),
        QnaError::NotFound(missing)
    );
    assert_eq!(deleted_flags(&question), vec![false]);
}

#[test]
fn delete_answer_does_not_check_ownership() {
    let alice = javajigi();
    let bob = sanjigi();
    let mut question = question_by(&alice);
    let bobs = attach(&mut question, &bob, "from bob");

    question.delete_answer(bobs).unwrap();
    assert_eq!(question.answers().count(), 0);
}

#[test]
fn answers_keeps_insertion_order_for_any_deleted_mix() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    let ids: Vec<Uuid> = (0..6)
        .map(|n| attach(&mut question, &alice, &format!("answer {n}")))
        .collect();

    for index in [0, 3, 4] {
        question.delete_answer(ids[index]).unwrap();
    }

    let visible: Vec<Uuid> = question.answers().map(|answer| answer.id()).collect();
    assert_eq!(visible, vec![ids[1], ids[2], ids[5]]);
    assert!(question.answers().all(|answer| !answer.is_deleted()));

    let restart = question.answers();
    assert_eq!(restart.clone().count(), restart.count());
}

#[test]
fn delete_by_writer_cascades_to_own_answers() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    let a1 = attach(&mut question, &alice, "x");
    let a2 = attach(&mut question, &alice, "y");
    let a3 = attach(&mut question, &alice, "z");
    question.delete_answer(a2).unwrap();

    let histories = question.delete_at(&alice, 1_700_000_000_000).unwrap();

    assert!(question.is_deleted());
    assert_eq!(deleted_flags(&question), vec![true, true, true]);
    assert_eq!(question.answers().count(), 0);

    let records: Vec<(ContentType, Uuid)> = histories
        .iter()
        .map(|history| (history.content_type(), history.content_id()))
        .collect();
    assert_eq!(
        records,
        vec![
            (ContentType::Question, question.id()),
            (ContentType::Answer, a1),
            (ContentType::Answer, a3),
        ]
    );
    assert!(histories
        .iter()
        .all(|history| history.deleted_by() == alice.id()
            && history.deleted_at() == 1_700_000_000_000));
}

#[test]
fn delete_without_answers_yields_only_question_record() {
    let alice = javajigi();
    let mut question = question_by(&alice);

    let histories = question.delete(&alice).unwrap();

    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].content_type(), ContentType::Question);
    assert!(histories[0].deleted_at() > 0);
}

#[test]
fn delete_by_non_writer_is_not_owner_and_changes_nothing() {
    let alice = javajigi();
    let bob = sanjigi();
    let mut question = question_by(&alice);
    attach(&mut question, &alice, "x");

    let err = question.delete(&bob).unwrap_err();

    assert_eq!(
        err,
        QnaError::NotOwner {
            question_id: question.id(),
            requester: bob.id(),
        }
    );
    assert!(!question.is_deleted());
    assert_eq!(deleted_flags(&question), vec![false]);
}

#[test]
fn delete_of_draft_is_not_owner() {
    let alice = javajigi();
    let mut draft = Question::new("title", "contents");

    let err = draft.delete(&alice).unwrap_err();
    assert!(matches!(err, QnaError::NotOwner { .. }));
    assert!(!draft.is_deleted());
}

#[test]
fn live_foreign_answer_blocks_delete_and_changes_nothing() {
    let alice = javajigi();
    let bob = sanjigi();
    let mut question = question_by(&alice);
    attach(&mut question, &alice, "own");
    let bobs = attach(&mut question, &bob, "foreign");

    let err = question.delete(&alice).unwrap_err();

    assert_eq!(
        err,
        QnaError::CannotDeleteAnswerOfOther {
            question_id: question.id(),
            answer_id: bobs,
        }
    );
    assert!(!question.is_deleted());
    assert_eq!(deleted_flags(&question), vec![false, false]);
    assert_eq!(question.answers().count(), 2);
}

#[test]
fn deleted_foreign_answer_does_not_block_delete() {
    let alice = javajigi();
    let bob = sanjigi();
    let mut question = question_by(&alice);
    let own = attach(&mut question, &alice, "own");
    let bobs = attach(&mut question, &bob, "foreign");
    question.delete_answer(bobs).unwrap();

    let histories = question.delete(&alice).unwrap();

    assert!(question.is_deleted());
    let answer_ids: Vec<Uuid> = histories
        .iter()
        .filter(|history| history.content_type() == ContentType::Answer)
        .map(|history| history.content_id())
        .collect();
    assert_eq!(answer_ids, vec![own]);
}

#[test]
fn deleted_question_is_terminal() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    question.delete(&alice).unwrap();

    assert!(question.delete(&alice).unwrap().is_empty());
    assert!(question.is_deleted());

    let late = Answer::new(Some(&alice), Some(&question), "late").unwrap();
    let err = question.add_answer(late).unwrap_err();
    assert!(matches!(err, QnaError::InvalidArgument(_)));

    let err = question.clone().write_by(Some(&sanjigi())).unwrap_err();
    assert!(matches!(err, QnaError::InvalidArgument(_)));
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    attach(&mut question, &alice, "x");

    let json = serde_json::to_value(&question).unwrap();
    assert_eq!(json["id"], question.id().to_string());
    assert_eq!(json["title"], "title1");
    assert_eq!(json["deleted"], false);
    assert_eq!(json["writer"]["user_id"], "javajigi");
    assert_eq!(json["answers"][0]["deleted"], false);

    let decoded: Question = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, question);
    let writer = decoded.writer().unwrap();
    assert!(writer.matches_password("password"));
    assert!(decoded.answers().all(|answer| answer.writer().matches_password("password")));
}

#[test]
fn deserialize_rejects_nil_answer_and_writer_ids() {
    let alice = javajigi();
    let mut question = question_by(&alice);
    attach(&mut question, &alice, "x");
    let json = serde_json::to_value(&question).unwrap();

    let mut nil_answer = json.clone();
    nil_answer["answers"][0]["id"] = serde_json::json!(Uuid::nil().to_string());
    let err = serde_json::from_value::<Question>(nil_answer).unwrap_err();
    assert!(err.to_string().contains("answer id must not be nil"), "unexpected error: {err}");

    let mut nil_writer = json.clone();
    nil_writer["answers"][0]["writer"]["id"] = serde_json::json!(Uuid::nil().to_string());
    let err = serde_json::from_value::<Question>(nil_writer).unwrap_err();
    assert!(err.to_string().contains("user id must not be nil"), "unexpected error: {err}");

    let mut missing_password = json;
    missing_password["writer"]
        .as_object_mut()
        .unwrap()
        .remove("password");
    assert!(serde_json::from_value::<Question>(missing_password).is_err());
}

#[test]
fn soft_delete_state_is_read_through_the_trait() {
    fn deleted<T: SoftDelete>(item: &T) -> bool {
        item.is_deleted()
    }

    let alice = javajigi();
    let mut question = question_by(&alice);
    let answer_id = attach(&mut question, &alice, "x");
    assert!(!deleted(&question));

    question.delete(&alice).unwrap();
    assert!(deleted(&question));
    assert!(deleted(question.find_answer(answer_id).unwrap()));
}

#[test]
fn deserialize_rejects_answer_of_another_question() {
    let alice = javajigi();
    let question = question_by(&alice);
    let other = question_by(&alice);
    let foreign = Answer::new(Some(&alice), Some(&other), "elsewhere").unwrap();

    let mut json = serde_json::to_value(&question).unwrap();
    json["answers"] = serde_json::json!([serde_json::to_value(&foreign).unwrap()]);

    let err = serde_json::from_value::<Question>(json).unwrap_err();
    assert!(
        err.to_string().contains("answer belongs to another question"),
        "unexpected error: {err}"
    );
}

#[test]
fn delete_history_serializes_content_type_in_snake_case() {
    let alice = javajigi();
    let mut question = question_by(&alice);

    let histories = question.delete_at(&alice, 42).unwrap();
    let json = serde_json::to_value(&histories[0]).unwrap();
    assert_eq!(json["content_type"], "question");
    assert_eq!(json["deleted_at"], 42);
}
