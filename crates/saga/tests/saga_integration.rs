//! Integration tests for the course-creation saga.

use std::time::Duration;

use domain::{CourseDraft, Difficulty, MAX_UPLOAD_BYTES, VideoDraft, VideoFile};
use saga::{
    CourseSagaCoordinator, Deadlines, RecordingInvalidations, RecordingNotifications, SagaError,
};
use store::{CatalogStore, InMemoryCatalogStore, InMemoryObjectStore, ObjectStore};

type TestCoordinator = CourseSagaCoordinator<
    InMemoryCatalogStore,
    InMemoryObjectStore,
    RecordingNotifications,
    RecordingInvalidations,
>;

struct TestHarness {
    coordinator: TestCoordinator,
    catalog: InMemoryCatalogStore,
    objects: InMemoryObjectStore,
    notifications: RecordingNotifications,
    cache: RecordingInvalidations,
}

impl TestHarness {
    fn new() -> Self {
        let catalog = InMemoryCatalogStore::new();
        let objects = InMemoryObjectStore::new();
        let notifications = RecordingNotifications::new();
        let cache = RecordingInvalidations::new();

        let coordinator = CourseSagaCoordinator::new(
            catalog.clone(),
            objects.clone(),
            notifications.clone(),
            cache.clone(),
        );

        Self {
            coordinator,
            catalog,
            objects,
            notifications,
            cache,
        }
    }
}

fn course_draft(title: &str) -> CourseDraft {
    CourseDraft {
        title: title.to_string(),
        description: Some("A realistic course".to_string()),
        instructor_name: Some("Niklaus".to_string()),
        duration_hours: Some(10),
        difficulty: Some(Difficulty::Beginner),
    }
}

fn video_draft() -> VideoDraft {
    VideoDraft {
        title: "Introduction".to_string(),
        file: VideoFile::new("intro.mp4", "video/mp4", vec![7u8; 128]),
        duration_minutes: Some(12),
        description: Some("What this course covers".to_string()),
    }
}

// P1: the created video row links to the created course and carries the
// resolved public address of the generated key.
#[tokio::test]
async fn happy_path_creates_course_and_linked_video() {
    let h = TestHarness::new();

    let course = h
        .coordinator
        .create_course_with_video(course_draft("Saga Course"), video_draft())
        .await
        .unwrap();

    let listed = h.catalog.list_courses().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, course.id);

    let videos = h.catalog.list_videos(course.id).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].course_id, course.id);
    assert_eq!(videos[0].title, "Introduction");

    let keys = h.objects.keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(videos[0].video_url, h.objects.public_url(&keys[0]).unwrap());

    assert_eq!(h.notifications.successes().len(), 1);
    assert_eq!(
        h.cache.tags(),
        vec!["courses".to_string(), format!("course:{}", course.id)]
    );
}

// P2: an upload failure must not leave an orphan course row behind.
#[tokio::test]
async fn upload_failure_leaves_no_orphan_course() {
    let h = TestHarness::new();
    h.objects.set_fail_on_upload(true);

    let result = h
        .coordinator
        .create_course_with_video(course_draft("Orphan Check"), video_draft())
        .await;
    assert!(result.is_err());

    let listed = h.catalog.list_courses().await.unwrap();
    assert!(!listed.iter().any(|c| c.title == "Orphan Check"));
    assert!(h.objects.removed_keys().is_empty());
}

// P3: a failed video insert rolls back both the uploaded object and the
// course row, and the surfaced error is the insert error.
#[tokio::test]
async fn link_failure_rolls_back_object_then_course() {
    let h = TestHarness::new();
    h.catalog.set_fail_on_insert_video(true);

    let err = h
        .coordinator
        .create_course_with_video(course_draft("Rollback"), video_draft())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "relational store rejected video insert");
    assert_eq!(h.objects.object_count(), 0);
    assert_eq!(h.objects.removed_keys().len(), 1);
    assert_eq!(h.catalog.course_count(), 0);
    assert_eq!(h.catalog.deleted_courses().len(), 1);
}

// P4: a failing compensation is swallowed; the caller still sees the
// original video-insert error.
#[tokio::test]
async fn compensation_failure_is_swallowed() {
    let h = TestHarness::new();
    h.catalog.set_fail_on_insert_video(true);
    h.objects.set_fail_on_delete(true);

    let err = h
        .coordinator
        .create_course_with_video(course_draft("Swallowed"), video_draft())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "relational store rejected video insert");
    // The delete was attempted and failed; the object remains an orphan.
    assert_eq!(h.objects.removed_keys().len(), 1);
    assert_eq!(h.objects.object_count(), 1);
    // The course compensation still ran after the object one failed.
    assert_eq!(h.catalog.course_count(), 0);

    let failures = h.notifications.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("relational store rejected video insert"));
}

// A failed compensating course-delete is swallowed like any other
// compensation failure; the caller still sees the original insert error and
// the orphan row and object are left behind for operators.
#[tokio::test]
async fn course_delete_compensation_failure_is_swallowed() {
    let h = TestHarness::new();
    h.catalog.set_fail_on_insert_video(true);
    h.catalog.set_fail_on_delete_course(true);
    h.objects.set_fail_on_delete(true);

    let err = h
        .coordinator
        .create_course_with_video(course_draft("Orphan Row"), video_draft())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "relational store rejected video insert");
    // Both compensations were attempted; both failed and left orphans.
    assert_eq!(h.objects.removed_keys().len(), 1);
    assert_eq!(h.objects.object_count(), 1);
    assert_eq!(h.catalog.deleted_courses().len(), 1);
    assert_eq!(h.catalog.course_count(), 1);

    let failures = h.notifications.failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("relational store rejected video insert"));
}

// P5: a backend that never settles produces a timeout at the configured
// deadline, not before and not indefinitely after.
#[tokio::test(start_paused = true)]
async fn hanging_backend_times_out_at_the_deadline() {
    let h = TestHarness::new();
    h.catalog.set_hang_on_insert_course(true);

    let started = tokio::time::Instant::now();
    let err = h
        .coordinator
        .create_course_with_video(course_draft("Hung"), video_draft())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        "request timed out while creating course after 30s"
    );
    assert_eq!(started.elapsed(), Duration::from_secs(30));
}

// A timeout past step 1 is treated like any backend error: completed steps
// are compensated.
#[tokio::test(start_paused = true)]
async fn link_timeout_triggers_full_rollback() {
    let h = TestHarness::new();
    h.catalog.set_hang_on_insert_video(true);

    let err = h
        .coordinator
        .create_course_with_video(course_draft("Hung Link"), video_draft())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(h.objects.object_count(), 0);
    assert_eq!(h.catalog.course_count(), 0);
}

// P6: an oversized file is rejected before any backend call.
#[tokio::test]
async fn oversized_file_makes_no_backend_calls() {
    let h = TestHarness::new();

    let mut video = video_draft();
    video.file.bytes = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];

    let err = h
        .coordinator
        .create_course_with_video(course_draft("Too Big"), video)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(h.catalog.course_count(), 0);
    assert!(h.catalog.deleted_courses().is_empty());
    assert_eq!(h.objects.object_count(), 0);
    assert!(h.objects.removed_keys().is_empty());
}

// P7: key naming is `{courseId}-{timestampMillis}.{ext}`; the pure function
// is covered in unit tests, here we check the shape end to end.
#[tokio::test]
async fn generated_key_has_course_id_prefix_and_file_extension() {
    let h = TestHarness::new();

    let course = h
        .coordinator
        .create_course_with_video(course_draft("Key Shape"), video_draft())
        .await
        .unwrap();

    let keys = h.objects.keys();
    assert_eq!(keys.len(), 1);
    let rest = keys[0]
        .strip_prefix(&format!("{}-", course.id))
        .expect("key starts with course id");
    let millis = rest.strip_suffix(".mp4").expect("key ends with extension");
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
}

// Custom deadline budgets are honored.
#[tokio::test(start_paused = true)]
async fn configured_upload_deadline_is_used() {
    let catalog = InMemoryCatalogStore::new();
    let objects = InMemoryObjectStore::new();
    objects.set_hang_on_upload(true);

    let coordinator = CourseSagaCoordinator::new(
        catalog,
        objects,
        RecordingNotifications::new(),
        RecordingInvalidations::new(),
    )
    .with_deadlines(Deadlines {
        upload: Duration::from_secs(5),
        ..Deadlines::default()
    });

    let started = tokio::time::Instant::now();
    let err = coordinator
        .create_course_with_video(course_draft("Short Budget"), video_draft())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}
