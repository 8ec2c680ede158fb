use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn lists_students_across_all_classes() {
    let app = TestApp::spawn().await;
    let (teacher, _, _) = app.classroom("alice01").await;
    let second = app.create_class(&teacher.token, "Steno 102").await;
    app.add_student(&teacher.token, &second, "bob_02").await;

    let other = app.create_teacher("other@example.com").await;
    let other_class = app.create_class(&other.token, "Elsewhere").await;
    app.add_student(&other.token, &other_class, "carol03").await;

    let res = app
        .post_with_token(routes::TEACHER_STUDENTS, &json!({}), &teacher.token)
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
}

#[tokio::test]
async fn teacher_without_classes_has_no_students() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;

    let res = app
        .post_with_token(routes::TEACHER_STUDENTS, &json!({}), &teacher.token)
        .await;

    assert_eq!(res.status, 200);
    assert!(res.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn students_cannot_list_students() {
    let app = TestApp::spawn().await;
    let (_, _, student_token) = app.classroom("alice01").await;

    let res = app
        .post_with_token(routes::TEACHER_STUDENTS, &json!({}), &student_token)
        .await;

    assert_eq!(res.status, 403);
}
