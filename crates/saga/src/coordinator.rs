//! Saga coordinator for course creation.

use std::time::Instant;

use chrono::Utc;
use common::CourseId;
use domain::{Course, CourseDraft, NewVideo, VideoAsset, VideoDraft};
use store::{CatalogStore, ObjectStore, UploadOptions};

use crate::deadline::{Deadlines, with_deadline};
use crate::error::SagaError;
use crate::run::SagaRun;
use crate::sinks::{CacheInvalidator, NotificationSink, course_list_tag, course_tag};
use crate::storage_key::storage_key;

/// Orchestrates course creation across the catalog and object stores.
///
/// The coordinator drives a 3-step saga (course row → binary upload → video
/// row) with best-effort compensation in reverse order on failure. Input
/// validation runs before the saga starts, so no backend is contacted for an
/// invalid draft.
pub struct CourseSagaCoordinator<C, O, N, V>
where
    C: CatalogStore,
    O: ObjectStore,
    N: NotificationSink,
    V: CacheInvalidator,
{
    catalog: C,
    objects: O,
    notifications: N,
    cache: V,
    deadlines: Deadlines,
}

impl<C, O, N, V> CourseSagaCoordinator<C, O, N, V>
where
    C: CatalogStore,
    O: ObjectStore,
    N: NotificationSink,
    V: CacheInvalidator,
{
    /// Creates a coordinator with the default deadline budgets.
    pub fn new(catalog: C, objects: O, notifications: N, cache: V) -> Self {
        Self {
            catalog,
            objects,
            notifications,
            cache,
            deadlines: Deadlines::default(),
        }
    }

    /// Replaces the deadline budgets.
    pub fn with_deadlines(mut self, deadlines: Deadlines) -> Self {
        self.deadlines = deadlines;
        self
    }

    /// Creates a course together with its first video.
    ///
    /// On success every cached course read is invalidated and the created
    /// course is returned. On failure all completed steps are compensated in
    /// reverse order and the error that triggered the rollback is returned;
    /// compensation failures are logged and swallowed.
    #[tracing::instrument(skip(self, draft, video), fields(course_title = %draft.title))]
    pub async fn create_course_with_video(
        &self,
        draft: CourseDraft,
        video: VideoDraft,
    ) -> Result<Course, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let mut run = SagaRun::new();
        let result = self.run_steps(&mut run, &draft, video).await;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);

        match result {
            Ok(course) => {
                metrics::counter!("saga_completed").increment(1);
                self.cache.invalidate(course_list_tag());
                self.cache.invalidate(&course_tag(course.id));
                self.notifications
                    .notify_success("Course and video created successfully!");
                tracing::info!(course_id = %course.id, duration, "course creation saga completed");
                Ok(course)
            }
            Err(err) => {
                self.roll_back(&mut run).await;
                metrics::counter!("saga_failed").increment(1);
                self.notifications
                    .notify_failure(&format!("Failed to create course: {err}"));
                tracing::warn!(state = %run.state(), error = %err, "course creation saga failed");
                Err(err)
            }
        }
    }

    async fn run_steps(
        &self,
        run: &mut SagaRun,
        draft: &CourseDraft,
        video: VideoDraft,
    ) -> Result<Course, SagaError> {
        // Precondition gate, not a saga step: an invalid draft never reaches
        // a backend.
        draft.validate()?;
        video.validate()?;

        // Step 1: course row.
        let course = with_deadline(
            self.catalog.insert_course(draft),
            self.deadlines.course_insert,
            "creating course",
        )
        .await?;
        run.course_created(course.id);
        tracing::info!(course_id = %course.id, "course row created");

        // Step 2: upload the binary, then resolve its public address.
        let key = storage_key(
            course.id,
            &video.file.filename,
            Utc::now().timestamp_millis(),
        );
        let options = UploadOptions::for_video(video.file.content_type_or_default());
        with_deadline(
            self.objects.upload(&key, &video.file.bytes, &options),
            self.deadlines.upload,
            "uploading video",
        )
        .await?;
        run.asset_uploaded(key.clone());

        // An address the store cannot resolve is an upload failure; an empty
        // address is not a valid asset.
        let asset = match self.objects.public_url(&key) {
            Some(public_url) => VideoAsset {
                path: key,
                public_url,
            },
            None => return Err(SagaError::MissingPublicUrl { key }),
        };
        tracing::info!(course_id = %course.id, path = %asset.path, "video asset uploaded");

        // Step 3: video row linking the asset to the course.
        let linked = with_deadline(
            self.catalog.insert_video(NewVideo {
                course_id: course.id,
                title: video.title,
                video_url: asset.public_url,
                duration_minutes: video.duration_minutes,
                description: video.description,
            }),
            self.deadlines.video_insert,
            "creating video",
        )
        .await?;
        run.linked();
        tracing::info!(course_id = %course.id, video_id = %linked.id, "video row linked");

        Ok(course)
    }

    /// Runs compensations for completed steps in reverse creation order:
    /// the uploaded object first, then the course row. The video row never
    /// existed at this point, so no link needs breaking.
    ///
    /// Best-effort: a failed compensation leaves a recoverable orphan behind
    /// and is logged, never folded into the saga result.
    async fn roll_back(&self, run: &mut SagaRun) {
        if !run.state().can_roll_back() {
            run.failed();
            return;
        }
        run.rolling_back();

        if let Some(key) = run.uploaded_key() {
            match with_deadline(
                self.objects.delete(key),
                self.deadlines.file_delete,
                "deleting video file",
            )
            .await
            {
                Ok(()) => tracing::info!(key, "compensation removed uploaded object"),
                Err(e) => {
                    metrics::counter!("saga_compensation_failed").increment(1);
                    tracing::warn!(key, error = %e, "compensation failed to remove uploaded object");
                }
            }
        }

        if let Some(course_id) = run.course_id() {
            match with_deadline(
                self.catalog.delete_course(course_id),
                self.deadlines.course_delete,
                "deleting course",
            )
            .await
            {
                Ok(()) => tracing::info!(%course_id, "compensation removed course row"),
                Err(e) => {
                    metrics::counter!("saga_compensation_failed").increment(1);
                    tracing::warn!(
                        %course_id, error = %e,
                        "compensation failed to remove course row, orphan row remains"
                    );
                }
            }
        }

        run.failed();
    }

    /// Deletes a course directly, outside any saga. A failure is surfaced
    /// as-is; there is nothing to compensate.
    #[tracing::instrument(skip(self))]
    pub async fn delete_course(&self, id: CourseId) -> Result<(), SagaError> {
        match with_deadline(
            self.catalog.delete_course(id),
            self.deadlines.course_delete,
            "deleting course",
        )
        .await
        {
            Ok(()) => {
                self.cache.invalidate(course_list_tag());
                self.cache.invalidate(&course_tag(id));
                self.notifications
                    .notify_success("Course deleted successfully!");
                Ok(())
            }
            Err(err) => {
                self.notifications
                    .notify_failure(&format!("Failed to delete course: {err}"));
                Err(err)
            }
        }
    }

    /// Deletes an uploaded video file directly, outside any saga.
    #[tracing::instrument(skip(self))]
    pub async fn delete_video_file(&self, path: &str) -> Result<(), SagaError> {
        with_deadline(
            self.objects.delete(path),
            self.deadlines.file_delete,
            "deleting video file",
        )
        .await
    }

    /// The relational store client.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The object store client.
    pub fn objects(&self) -> &O {
        &self.objects
    }
}
