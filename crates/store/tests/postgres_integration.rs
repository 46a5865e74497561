//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{CourseId, UserId};
use domain::{CourseDraft, Difficulty, NewVideo};
use sqlx::PgPool;
use store::{CatalogStore, PostgresCatalogStore, StoreError};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/0001_create_catalog.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn store() -> PostgresCatalogStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresCatalogStore::new(pool)
}

fn draft(title: &str) -> CourseDraft {
    CourseDraft {
        title: title.to_string(),
        description: Some("desc".to_string()),
        instructor_name: Some("Grace".to_string()),
        duration_hours: Some(8),
        difficulty: Some(Difficulty::Advanced),
    }
}

#[tokio::test]
#[serial_test::serial]
async fn insert_and_fetch_course_roundtrip() {
    let store = store().await;
    let course = store.insert_course(&draft("pg roundtrip")).await.unwrap();

    assert_eq!(course.title, "pg roundtrip");
    assert_eq!(course.difficulty, Some(Difficulty::Advanced));
    assert_eq!(course.duration_hours, Some(8));

    let fetched = store.get_course(course.id).await.unwrap().unwrap();
    assert_eq!(fetched, course);

    store.delete_course(course.id).await.unwrap();
}

#[tokio::test]
#[serial_test::serial]
async fn get_absent_course_returns_none() {
    let store = store().await;
    let fetched = store.get_course(CourseId::new()).await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
#[serial_test::serial]
async fn list_courses_newest_first() {
    let store = store().await;
    let first = store.insert_course(&draft("pg list first")).await.unwrap();
    let second = store.insert_course(&draft("pg list second")).await.unwrap();

    let courses = store.list_courses().await.unwrap();
    let pos_first = courses.iter().position(|c| c.id == first.id).unwrap();
    let pos_second = courses.iter().position(|c| c.id == second.id).unwrap();
    assert!(pos_second < pos_first);

    store.delete_course(first.id).await.unwrap();
    store.delete_course(second.id).await.unwrap();
}

#[tokio::test]
#[serial_test::serial]
async fn video_insert_requires_existing_course() {
    let store = store().await;
    let result = store
        .insert_video(NewVideo {
            course_id: CourseId::new(),
            title: "orphan".to_string(),
            video_url: "https://storage.example/x.mp4".to_string(),
            duration_minutes: Some(5),
            description: None,
        })
        .await;
    assert!(matches!(result, Err(StoreError::CourseNotFound(_))));
}

#[tokio::test]
#[serial_test::serial]
async fn deleting_course_cascades_to_videos_and_enrollments() {
    let store = store().await;
    let course = store.insert_course(&draft("pg cascade")).await.unwrap();
    store
        .insert_video(NewVideo {
            course_id: course.id,
            title: "intro".to_string(),
            video_url: "https://storage.example/intro.mp4".to_string(),
            duration_minutes: Some(10),
            description: Some("first lesson".to_string()),
        })
        .await
        .unwrap();
    let user = UserId::new();
    store.insert_enrollment(user, course.id).await.unwrap();

    store.delete_course(course.id).await.unwrap();

    assert!(store.list_videos(course.id).await.unwrap().is_empty());
    assert!(store.list_enrollments(user).await.unwrap().is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn duplicate_enrollment_maps_to_typed_error() {
    let store = store().await;
    let course = store.insert_course(&draft("pg enroll")).await.unwrap();
    let user = UserId::new();

    store.insert_enrollment(user, course.id).await.unwrap();
    let result = store.insert_enrollment(user, course.id).await;
    assert!(matches!(
        result,
        Err(StoreError::DuplicateEnrollment { .. })
    ));

    store.delete_course(course.id).await.unwrap();
}

#[tokio::test]
#[serial_test::serial]
async fn enrollment_roundtrip() {
    let store = store().await;
    let course = store.insert_course(&draft("pg unenroll")).await.unwrap();
    let user = UserId::new();

    let enrollment = store.insert_enrollment(user, course.id).await.unwrap();
    assert_eq!(enrollment.user_id, user);
    assert_eq!(enrollment.course_id, course.id);

    let fetched = store.get_enrollment(user, course.id).await.unwrap();
    assert_eq!(fetched, Some(enrollment));

    store.delete_enrollment(user, course.id).await.unwrap();
    assert!(store.get_enrollment(user, course.id).await.unwrap().is_none());

    store.delete_course(course.id).await.unwrap();
}
