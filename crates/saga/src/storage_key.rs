//! Storage key naming for uploaded video files.

use common::CourseId;

/// Returns the extension of a filename: the suffix after the last `.`, or
/// `None` when the filename has no dot or ends with one.
pub fn file_extension(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Builds the storage key for a course's video upload:
/// `{course_id}-{now_millis}.{extension}`, with the extension omitted when
/// the original filename has none.
///
/// The caller supplies the clock reading so key generation stays
/// deterministic under test.
pub fn storage_key(course_id: CourseId, filename: &str, now_millis: i64) -> String {
    match file_extension(filename) {
        Some(ext) => format!("{course_id}-{now_millis}.{ext}"),
        None => format!("{course_id}-{now_millis}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn course_id(s: &str) -> CourseId {
        CourseId::from_uuid(Uuid::parse_str(s).unwrap())
    }

    #[test]
    fn key_combines_course_id_clock_and_extension() {
        let id = course_id("6f2f95a4-54a1-4b9e-b6b4-7aeb4e4a3a11");
        let key = storage_key(id, "intro.mp4", 1_700_000_000_123);
        assert_eq!(
            key,
            "6f2f95a4-54a1-4b9e-b6b4-7aeb4e4a3a11-1700000000123.mp4"
        );
    }

    #[test]
    fn extension_is_the_suffix_after_the_last_dot() {
        assert_eq!(file_extension("lecture.final.mov"), Some("mov"));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz"));
    }

    #[test]
    fn filename_without_extension_yields_key_without_one() {
        let id = course_id("6f2f95a4-54a1-4b9e-b6b4-7aeb4e4a3a11");
        let key = storage_key(id, "rawvideo", 42);
        assert_eq!(key, "6f2f95a4-54a1-4b9e-b6b4-7aeb4e4a3a11-42");
    }

    #[test]
    fn trailing_dot_counts_as_no_extension() {
        assert_eq!(file_extension("clip."), None);
    }

    #[test]
    fn leading_dot_filename_keeps_its_suffix() {
        assert_eq!(file_extension(".hidden"), Some("hidden"));
    }

    #[test]
    fn same_inputs_produce_the_same_key() {
        let id = CourseId::new();
        assert_eq!(
            storage_key(id, "a.mp4", 1000),
            storage_key(id, "a.mp4", 1000)
        );
    }
}
