use sea_orm::EntityTrait;
use serde_json::json;

use stenoclass_server::entity::teacher;

use crate::common::{STUDENT_PASSWORD, TEACHER_PASSWORD, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_teacher_can_register_with_valid_details() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"name": "Ms. Rivera", "email": "Rivera@Example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["user"]["email"], "rivera@example.com");
        assert_eq!(res.body["user"]["role"], "teacher");
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn cannot_register_an_email_twice() {
        let app = TestApp::spawn().await;
        let body = json!({"name": "Ms. Rivera", "email": "rivera@example.com", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn missing_field_is_rejected_without_a_write() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "rivera@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "All fields are required");

        let teachers = teacher::Entity::find().all(&app.db).await.unwrap();
        assert!(teachers.is_empty());
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"name": "Ms. Rivera", "email": "rivera@example.com", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn wrongly_typed_field_gets_a_detailed_message() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"name": 5, "email": "rivera@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_ne!(res.body["message"], "All fields are required");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn teacher_login_returns_token_without_password() {
        let app = TestApp::spawn().await;
        app.create_teacher("rivera@example.com").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "rivera@example.com", "password": TEACHER_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Login successful");
        assert!(res.body["token"].is_string());
        assert!(res.body["user"].get("password").is_none());
        assert!(res.body["user"].get("sessionToken").is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = TestApp::spawn().await;
        app.create_teacher("rivera@example.com").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "rivera@example.com", "password": "wrong-password"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
        assert_eq!(res.body["error"], res.body["message"]);
    }

    #[tokio::test]
    async fn a_new_login_replaces_the_previous_token() {
        let app = TestApp::spawn().await;
        let first = app.create_teacher("rivera@example.com").await;

        let second = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "rivera@example.com", "password": TEACHER_PASSWORD}),
            )
            .await;
        assert_eq!(second.status, 200);

        let stale = app
            .post_with_token(routes::CLASS_FETCH, &json!({}), &first.token)
            .await;
        assert_eq!(stale.status, 401);
        assert_eq!(stale.body["code"], "TOKEN_INVALID");

        let fresh = app
            .post_with_token(routes::CLASS_FETCH, &json!({}), &second.token())
            .await;
        assert_eq!(fresh.status, 200);
    }

    #[tokio::test]
    async fn student_can_log_in_with_id_and_password() {
        let app = TestApp::spawn().await;
        let (_, class_id, _) = app.classroom("alice01").await;

        let res = app
            .post_without_token(
                routes::STUDENT_LOGIN,
                &json!({"studentId": "alice01", "password": STUDENT_PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["id"], "alice01");
        assert_eq!(res.body["user"]["role"], "student");
        assert_eq!(res.body["user"]["classId"], class_id);
    }

    #[tokio::test]
    async fn requests_without_a_token_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::CLASS_FETCH, &json!({})).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod logout {
    use super::*;

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("rivera@example.com").await;

        let res = app
            .post_with_token(routes::LOGOUT, &json!({"userId": teacher.id}), &teacher.token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Logged out successfully");

        let after = app
            .post_with_token(routes::CLASS_FETCH, &json!({}), &teacher.token)
            .await;
        assert_eq!(after.status, 401);
    }

    #[tokio::test]
    async fn subject_mismatch_is_rejected_and_session_kept() {
        let app = TestApp::spawn().await;
        let teacher = app.create_teacher("rivera@example.com").await;

        let res = app
            .post_with_token(routes::LOGOUT, &json!({"userId": "9999"}), &teacher.token)
            .await;
        assert_eq!(res.status, 401);

        let id: i32 = teacher.id.parse().unwrap();
        let stored = teacher::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.session_token.as_deref(), Some(teacher.token.as_str()));

        let still_works = app
            .post_with_token(routes::CLASS_FETCH, &json!({}), &teacher.token)
            .await;
        assert_eq!(still_works.status, 200);
    }

    #[tokio::test]
    async fn student_can_log_out() {
        let app = TestApp::spawn().await;
        let (_, _, student_token) = app.classroom("alice01").await;

        let res = app
            .post_with_token(routes::LOGOUT, &json!({"userId": "alice01"}), &student_token)
            .await;
        assert_eq!(res.status, 200);

        let after = app
            .post_with_token(routes::STUDENT_ASSIGNMENTS, &json!({}), &student_token)
            .await;
        assert_eq!(after.status, 401);
    }
}

mod docs {
    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_the_routes() {
        let app = TestApp::spawn().await;

        let res = app.get("/api-docs/openapi.json").await;

        assert_eq!(res.status, 200);
        assert!(res.body["paths"]["/api/v1/auth/login"].is_object());
        assert!(res.body["paths"]["/api/v1/student-assignments/submit"].is_object());
    }
}
