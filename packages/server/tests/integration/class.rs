use sea_orm::EntityTrait;
use serde_json::json;

use stenoclass_server::entity::{assignment, class, score};

use crate::common::{TestApp, routes};

#[tokio::test]
async fn teacher_creates_and_lists_classes() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;

    let res = app
        .post_with_token(routes::CLASS_CREATE, &json!({"name": "Steno 101"}), &teacher.token)
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["status"], 201);
    assert_eq!(res.data()["name"], "Steno 101");

    app.create_class(&teacher.token, "Steno 102").await;

    let list = app
        .post_with_token(routes::CLASS_FETCH, &json!({}), &teacher.token)
        .await;
    assert_eq!(list.status, 200);
    assert_eq!(list.data().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_name_is_rejected() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;

    let res = app
        .post_with_token(routes::CLASS_CREATE, &json!({}), &teacher.token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "All fields are required");
    assert!(class::Entity::find().all(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn students_cannot_manage_classes() {
    let app = TestApp::spawn().await;
    let (_, _, student_token) = app.classroom("alice01").await;

    let res = app
        .post_with_token(routes::CLASS_CREATE, &json!({"name": "Mine"}), &student_token)
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn another_teachers_class_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, class_id, _) = app.classroom("alice01").await;
    let other = app.create_teacher("other@example.com").await;

    let res = app
        .post_with_token(routes::CLASS_STUDENTS, &json!({"classId": class_id}), &other.token)
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn roster_lists_assigned_students() {
    let app = TestApp::spawn().await;
    let (teacher, class_id, _) = app.classroom("alice01").await;
    app.add_student(&teacher.token, &class_id, "bob_02").await;

    let res = app
        .post_with_token(routes::CLASS_STUDENTS, &json!({"classId": class_id}), &teacher.token)
        .await;

    assert_eq!(res.status, 200);
    let ids: Vec<&str> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"alice01"));
    assert!(ids.contains(&"bob_02"));
    assert!(res.data()[0].get("password").is_none());
}

#[tokio::test]
async fn new_student_needs_name_and_password() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;

    let res = app
        .post_with_token(
            routes::CLASS_ASSIGN_STUDENT,
            &json!({"classId": class_id, "studentId": "alice01"}),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "All fields are required");
}

#[tokio::test]
async fn assigning_twice_to_the_same_class_conflicts() {
    let app = TestApp::spawn().await;
    let (teacher, class_id, _) = app.classroom("alice01").await;

    let res = app
        .post_with_token(
            routes::CLASS_ASSIGN_STUDENT,
            &json!({"classId": class_id, "studentId": "alice01"}),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn existing_student_moves_between_the_teachers_classes() {
    let app = TestApp::spawn().await;
    let (teacher, _, _) = app.classroom("alice01").await;
    let second = app.create_class(&teacher.token, "Steno 102").await;

    let res = app
        .post_with_token(
            routes::CLASS_ASSIGN_STUDENT,
            &json!({"classId": second, "studentId": "alice01"}),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.data()["classId"], second);
}

#[tokio::test]
async fn student_of_another_teacher_cannot_be_taken_over() {
    let app = TestApp::spawn().await;
    app.classroom("alice01").await;
    let other = app.create_teacher("other@example.com").await;
    let other_class = app.create_class(&other.token, "Elsewhere").await;

    let res = app
        .post_with_token(
            routes::CLASS_ASSIGN_STUDENT,
            &json!({"classId": other_class, "studentId": "alice01"}),
            &other.token,
        )
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["message"], "Student ID is already taken");
}

#[tokio::test]
async fn removing_a_student_clears_the_class() {
    let app = TestApp::spawn().await;
    let (teacher, class_id, _) = app.classroom("alice01").await;

    let res = app
        .post_with_token(
            routes::CLASS_REMOVE_STUDENT,
            &json!({"classId": class_id, "studentId": "alice01"}),
            &teacher.token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert!(res.data()["classId"].is_null());

    let roster = app
        .post_with_token(routes::CLASS_STUDENTS, &json!({"classId": class_id}), &teacher.token)
        .await;
    assert!(roster.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_class_keeps_assignments_and_scores() {
    let app = TestApp::spawn().await;
    let (teacher, class_id, student_token) = app.classroom("alice01").await;
    let assignment_id = app
        .create_assignment(&teacher.token, &class_id, "the quick brown fox")
        .await;

    let submit = app
        .post_with_token(
            routes::SCORE_CREATE,
            &json!({
                "assignmentId": assignment_id,
                "typedText": "the quick brown fox",
                "accuracy": 100.0,
                "wpm": 40.0,
            }),
            &student_token,
        )
        .await;
    assert_eq!(submit.status, 200, "score create failed: {}", submit.text);

    let res = app
        .post_with_token(routes::CLASS_DELETE, &json!({"classId": class_id}), &teacher.token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["id"], class_id);

    let assignments = assignment::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].class_id, class_id);
    let scores = score::Entity::find().all(&app.db).await.unwrap();
    assert_eq!(scores.len(), 1);

    let list = app
        .post_with_token(routes::CLASS_FETCH, &json!({}), &teacher.token)
        .await;
    assert!(list.data().as_array().unwrap().is_empty());
}
