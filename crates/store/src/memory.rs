//! In-memory store implementations for testing.
//!
//! Both fakes honor the trait contracts of their real counterparts and add
//! test hooks: `fail_on_*` flags make the next matching call return a backend
//! error, `hang_on_*` flags make it suspend forever (for deadline tests), and
//! delete calls are recorded for rollback assertions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::{CourseId, UserId, VideoId};
use domain::{Course, CourseDraft, Enrollment, NewVideo, Video};

use crate::catalog::CatalogStore;
use crate::error::{Result, StoreError};
use crate::object::{ObjectStore, UploadOptions};

#[derive(Debug, Default)]
struct CatalogState {
    courses: HashMap<CourseId, Course>,
    videos: HashMap<VideoId, Video>,
    enrollments: Vec<Enrollment>,
    deleted_courses: Vec<CourseId>,
    fail_on_insert_course: bool,
    fail_on_insert_video: bool,
    fail_on_delete_course: bool,
    hang_on_insert_course: bool,
    hang_on_insert_video: bool,
}

/// In-memory relational catalog store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty in-memory catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail course inserts.
    pub fn set_fail_on_insert_course(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert_course = fail;
    }

    /// Configures the store to fail video inserts.
    pub fn set_fail_on_insert_video(&self, fail: bool) {
        self.state.write().unwrap().fail_on_insert_video = fail;
    }

    /// Configures the store to fail course deletes.
    pub fn set_fail_on_delete_course(&self, fail: bool) {
        self.state.write().unwrap().fail_on_delete_course = fail;
    }

    /// Configures course inserts to suspend forever.
    pub fn set_hang_on_insert_course(&self, hang: bool) {
        self.state.write().unwrap().hang_on_insert_course = hang;
    }

    /// Configures video inserts to suspend forever.
    pub fn set_hang_on_insert_video(&self, hang: bool) {
        self.state.write().unwrap().hang_on_insert_video = hang;
    }

    /// Number of course rows currently stored.
    pub fn course_count(&self) -> usize {
        self.state.read().unwrap().courses.len()
    }

    /// Number of video rows currently stored.
    pub fn video_count(&self) -> usize {
        self.state.read().unwrap().videos.len()
    }

    /// Course ids passed to `delete_course`, in call order.
    pub fn deleted_courses(&self) -> Vec<CourseId> {
        self.state.read().unwrap().deleted_courses.clone()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_course(&self, draft: &CourseDraft) -> Result<Course> {
        if self.state.read().unwrap().hang_on_insert_course {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_insert_course {
            return Err(StoreError::Backend(
                "relational store rejected course insert".to_string(),
            ));
        }

        let course = Course::from_draft(CourseId::new(), draft, Utc::now());
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>> {
        Ok(self.state.read().unwrap().courses.get(&id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        let state = self.state.read().unwrap();
        let mut courses: Vec<_> = state.courses.values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn delete_course(&self, id: CourseId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.deleted_courses.push(id);
        if state.fail_on_delete_course {
            return Err(StoreError::Backend(
                "relational store rejected course delete".to_string(),
            ));
        }
        state.courses.remove(&id);
        state.videos.retain(|_, v| v.course_id != id);
        state.enrollments.retain(|e| e.course_id != id);
        Ok(())
    }

    async fn insert_video(&self, new: NewVideo) -> Result<Video> {
        if self.state.read().unwrap().hang_on_insert_video {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_insert_video {
            return Err(StoreError::Backend(
                "relational store rejected video insert".to_string(),
            ));
        }
        if !state.courses.contains_key(&new.course_id) {
            return Err(StoreError::CourseNotFound(new.course_id));
        }

        let video = Video::from_new(VideoId::new(), &new, Utc::now());
        state.videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn list_videos(&self, course_id: CourseId) -> Result<Vec<Video>> {
        let state = self.state.read().unwrap();
        let mut videos: Vec<_> = state
            .videos
            .values()
            .filter(|v| v.course_id == course_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(videos)
    }

    async fn insert_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let mut state = self.state.write().unwrap();
        if !state.courses.contains_key(&course_id) {
            return Err(StoreError::CourseNotFound(course_id));
        }
        if state
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.course_id == course_id)
        {
            return Err(StoreError::DuplicateEnrollment { user_id, course_id });
        }

        let enrollment = Enrollment::new(user_id, course_id, Utc::now());
        state.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn delete_enrollment(&self, user_id: UserId, course_id: CourseId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state
            .enrollments
            .retain(|e| !(e.user_id == user_id && e.course_id == course_id));
        Ok(())
    }

    async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>> {
        let state = self.state.read().unwrap();
        Ok(state
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_enrollments(&self, user_id: UserId) -> Result<Vec<Enrollment>> {
        let state = self.state.read().unwrap();
        Ok(state
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
struct ObjectState {
    objects: HashMap<String, StoredObject>,
    removed_keys: Vec<String>,
    fail_on_upload: bool,
    fail_on_delete: bool,
    hang_on_upload: bool,
    unresolvable_urls: bool,
}

/// In-memory binary object store.
#[derive(Debug, Clone)]
pub struct InMemoryObjectStore {
    base_url: String,
    state: Arc<RwLock<ObjectState>>,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self {
            base_url: "https://storage.local/object/public/course-videos".to_string(),
            state: Arc::default(),
        }
    }
}

impl InMemoryObjectStore {
    /// Creates a new empty in-memory object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail uploads.
    pub fn set_fail_on_upload(&self, fail: bool) {
        self.state.write().unwrap().fail_on_upload = fail;
    }

    /// Configures the store to fail deletes.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.state.write().unwrap().fail_on_delete = fail;
    }

    /// Configures uploads to suspend forever.
    pub fn set_hang_on_upload(&self, hang: bool) {
        self.state.write().unwrap().hang_on_upload = hang;
    }

    /// Configures `public_url` to return `None`, simulating a store that
    /// cannot issue public addresses.
    pub fn set_unresolvable_urls(&self, unresolvable: bool) {
        self.state.write().unwrap().unresolvable_urls = unresolvable;
    }

    /// Number of objects currently stored.
    pub fn object_count(&self) -> usize {
        self.state.read().unwrap().objects.len()
    }

    /// Returns true if an object exists under the key.
    pub fn has_object(&self, key: &str) -> bool {
        self.state.read().unwrap().objects.contains_key(key)
    }

    /// Returns the stored contents of an object, if present.
    pub fn bytes_of(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .read()
            .unwrap()
            .objects
            .get(key)
            .map(|o| o.bytes.clone())
    }

    /// Returns the stored content type of an object, if present.
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .objects
            .get(key)
            .map(|o| o.content_type.clone())
    }

    /// Keys of all currently stored objects.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().unwrap().objects.keys().cloned().collect()
    }

    /// Keys passed to `delete`, in call order.
    pub fn removed_keys(&self) -> Vec<String> {
        self.state.read().unwrap().removed_keys.clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(&self, key: &str, bytes: &[u8], options: &UploadOptions) -> Result<()> {
        if self.state.read().unwrap().hang_on_upload {
            std::future::pending::<()>().await;
        }

        let mut state = self.state.write().unwrap();
        if state.fail_on_upload {
            return Err(StoreError::Backend(
                "object store rejected upload".to_string(),
            ));
        }
        if !options.upsert && state.objects.contains_key(key) {
            return Err(StoreError::Object {
                status: 409,
                key: key.to_string(),
                message: "The resource already exists".to_string(),
            });
        }

        state.objects.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: options.content_type.clone(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        if state.unresolvable_urls {
            return None;
        }
        Some(format!("{}/{}", self.base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.removed_keys.push(key.to_string());
        if state.fail_on_delete {
            return Err(StoreError::Backend(
                "object store rejected delete".to_string(),
            ));
        }
        state.objects.remove(key);
        Ok(())
    }
}
