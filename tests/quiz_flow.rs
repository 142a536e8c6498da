mod common;

use std::collections::HashSet;

use common::{correct_choice, expect_question, seed_category, test_pool, wrong_choice};
use web_quiz::quiz::flow::{check_answer, next_question, show_question};
use web_quiz::quiz::{EndReason, QuizError, QuizRules, QuizSession, QuizStep};

#[tokio::test]
async fn selector_skips_excluded_questions() {
    let pool = test_pool().await;
    let category = seed_category(&pool, "Rust", 3).await;

    let mut seen = vec![];
    while let Some(question) = next_question(&pool, category, &seen).await.unwrap() {
        assert_eq!(question.category_id, category);
        assert!(!seen.contains(&question.id));
        seen.push(question.id);
    }
    assert_eq!(seen.len(), 3);
}

#[tokio::test]
async fn correct_run_asks_every_question_once_then_ends() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Rust", 5).await;
    let mut session = QuizSession::default();

    let mut view = expect_question(
        show_question(&pool, &mut session, category, &rules)
            .await
            .unwrap(),
    );
    assert_eq!(view.previous_is_correct, None);
    let mut asked = vec![view.question.id];

    loop {
        let choice = correct_choice(&view).id;
        match check_answer(&pool, &mut session, category, Some(choice), &rules)
            .await
            .unwrap()
        {
            QuizStep::InProgress(next) => {
                assert_eq!(next.previous_is_correct, Some(true));
                asked.push(next.question.id);
                view = next;
            }
            QuizStep::Ended(reason) => {
                assert_eq!(reason, EndReason::Exhausted);
                break;
            }
        }
    }

    assert_eq!(asked.len(), 5);
    assert_eq!(asked.iter().collect::<HashSet<_>>().len(), 5);
    assert_eq!(session.asked_questions, asked);
    assert_eq!(session.score, 5);
    assert_eq!(session.wrong_answers, 0);
}

#[tokio::test]
async fn third_wrong_answer_ends_the_quiz() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "History", 10).await;
    let mut session = QuizSession::default();

    let mut view = expect_question(
        show_question(&pool, &mut session, category, &rules)
            .await
            .unwrap(),
    );
    for _ in 0..2 {
        let choice = wrong_choice(&view).id;
        view = expect_question(
            check_answer(&pool, &mut session, category, Some(choice), &rules)
                .await
                .unwrap(),
        );
        assert_eq!(view.previous_is_correct, Some(false));
    }
    let choice = wrong_choice(&view).id;
    let step = check_answer(&pool, &mut session, category, Some(choice), &rules)
        .await
        .unwrap();
    assert_eq!(step, QuizStep::Ended(EndReason::OutOfAttempts));
    assert_eq!(session.wrong_answers, 3);
    assert_eq!(session.asked_questions.len(), 3);

    // questions remain, the run stays over
    let step = show_question(&pool, &mut session, category, &rules)
        .await
        .unwrap();
    assert_eq!(step, QuizStep::Ended(EndReason::OutOfAttempts));
    assert_eq!(session.wrong_answers, 3);
    assert_eq!(session.asked_questions.len(), 3);
}

#[tokio::test]
async fn run_terminates_within_question_count_or_wrong_limit() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Mixed", 6).await;
    let mut session = QuizSession::default();

    let mut view = expect_question(
        show_question(&pool, &mut session, category, &rules)
            .await
            .unwrap(),
    );
    let mut answered = 0;
    loop {
        // alternate right and wrong answers
        let choice = if answered % 2 == 0 {
            correct_choice(&view).id
        } else {
            wrong_choice(&view).id
        };
        answered += 1;
        match check_answer(&pool, &mut session, category, Some(choice), &rules)
            .await
            .unwrap()
        {
            QuizStep::InProgress(next) => view = next,
            QuizStep::Ended(reason) => {
                // the sixth answer is the third wrong one
                assert_eq!(reason, EndReason::OutOfAttempts);
                break;
            }
        }
        assert!(answered < 6);
        assert!(session.wrong_answers < 3);
    }
    assert_eq!(answered, 6);
    assert_eq!(session.asked_questions.len(), 6);
    assert_eq!(session.score, 3);
    assert_eq!(session.wrong_answers, 3);
}

#[tokio::test]
async fn missing_choice_redisplays_current_question() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Rust", 4).await;
    let mut session = QuizSession::default();

    let view = expect_question(
        show_question(&pool, &mut session, category, &rules)
            .await
            .unwrap(),
    );
    let before = session.clone();

    let again = expect_question(
        check_answer(&pool, &mut session, category, None, &rules)
            .await
            .unwrap(),
    );
    assert_eq!(again.question, view.question);
    assert_eq!(again.previous_is_correct, None);
    assert_eq!(session, before);
}

#[tokio::test]
async fn answer_for_another_question_is_not_scored() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Rust", 4).await;
    let mut session = QuizSession::default();

    let first = expect_question(
        show_question(&pool, &mut session, category, &rules)
            .await
            .unwrap(),
    );
    let right = correct_choice(&first).id;
    let second = expect_question(
        check_answer(&pool, &mut session, category, Some(right), &rules)
            .await
            .unwrap(),
    );
    let before = session.clone();

    // double submit of the first answer
    let shown = expect_question(
        check_answer(&pool, &mut session, category, Some(right), &rules)
            .await
            .unwrap(),
    );
    assert_eq!(shown.question, second.question);
    assert_eq!(session, before);
    assert_eq!(session.score, 1);
}

#[tokio::test]
async fn unknown_choice_is_not_found() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Rust", 2).await;
    let mut session = QuizSession::default();
    show_question(&pool, &mut session, category, &rules)
        .await
        .unwrap();
    let before = session.clone();

    let err = check_answer(&pool, &mut session, category, Some(9999), &rules)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuizError::NotFound {
            entity: "choice",
            id: 9999
        }
    ));
    assert_eq!(session, before);
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let mut session = QuizSession::default();

    let err = show_question(&pool, &mut session, 42, &rules)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QuizError::NotFound {
            entity: "category",
            id: 42
        }
    ));
    assert_eq!(session, QuizSession::default());
}

#[tokio::test]
async fn empty_category_ends_immediately() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Empty", 0).await;
    let mut session = QuizSession::default();

    let step = show_question(&pool, &mut session, category, &rules)
        .await
        .unwrap();
    assert_eq!(step, QuizStep::Ended(EndReason::Empty));
    assert_eq!(session.category_id, Some(category));
    assert!(session.asked_questions.is_empty());
}

#[tokio::test]
async fn switching_category_starts_a_new_run() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let rust = seed_category(&pool, "Rust", 3).await;
    let history = seed_category(&pool, "History", 3).await;
    let mut session = QuizSession::default();

    let view = expect_question(show_question(&pool, &mut session, rust, &rules).await.unwrap());
    let right = correct_choice(&view).id;
    check_answer(&pool, &mut session, rust, Some(right), &rules)
        .await
        .unwrap();
    assert_eq!(session.score, 1);

    let view = expect_question(
        show_question(&pool, &mut session, history, &rules)
            .await
            .unwrap(),
    );
    assert_eq!(view.category.id, history);
    assert_eq!(session.category_id, Some(history));
    assert_eq!(session.score, 0);
    assert_eq!(session.asked_questions, vec![view.question.id]);
}

#[tokio::test]
async fn answer_without_active_session_starts_the_quiz() {
    let pool = test_pool().await;
    let rules = QuizRules::default();
    let category = seed_category(&pool, "Rust", 2).await;
    let mut session = QuizSession::default();

    let view = expect_question(
        check_answer(&pool, &mut session, category, None, &rules)
            .await
            .unwrap(),
    );
    assert_eq!(session.category_id, Some(category));
    assert_eq!(session.asked_questions, vec![view.question.id]);
    assert_eq!(session.score + session.wrong_answers, 0);
}
