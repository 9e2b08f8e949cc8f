//! File naming and public URL derivation for project images.
//!
//! Everything here is a pure function of its arguments. The static root and
//! upload directory come from [`MediaSettings`](crate::settings::MediaSettings)
//! and are passed in by the caller.

/// Slug used when a project name has no alphanumeric content.
pub const FALLBACK_SLUG: &str = "project";

/// URL-safe slug for a project name, falling back to [`FALLBACK_SLUG`].
pub fn project_slug(project_name: &str) -> String {
    let slug = slug::slugify(project_name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `"{slug}-{ordinal}.{extension}"`
pub fn derive_filename(project_name: &str, ordinal: i64, original_extension: &str) -> String {
    format!("{}-{}.{}", project_slug(project_name), ordinal, original_extension)
}

/// Concatenates the static root and the stored relative path as-is.
///
/// No separator is inserted or collapsed: `("/static/", "a.png")` gives
/// `"/static/a.png"` and `("/static//", "a.png")` gives `"/static//a.png"`.
pub fn derive_url(static_root: &str, relative_path: &str) -> String {
    format!("{}{}", static_root, relative_path)
}

/// Ordinal for the next image given how many images the project already has.
pub fn ordinal_after(existing_images: i64) -> i64 {
    existing_images + 1
}

/// Joins the upload directory and a file name into a storage-relative path.
pub fn upload_path(upload_dir: &str, file_name: &str) -> String {
    if upload_dir.is_empty() || upload_dir.ends_with('/') {
        format!("{}{}", upload_dir, file_name)
    } else {
        format!("{}/{}", upload_dir, file_name)
    }
}

/// Extension of an uploaded file.
///
/// Directory components of the client-supplied name are dropped first, then
/// whatever follows the last `.` is taken. A base name without any `.` is
/// sniffed from the payload; if the payload is not recognised the whole base
/// name is used.
pub fn upload_extension(file_name: &str, payload: &[u8]) -> String {
    let base_name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    match base_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_string(),
        None => infer::get(payload)
            .map(|kind| kind.extension().to_string())
            .unwrap_or_else(|| base_name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn filename_slugifies_project_name() {
        assert_eq!(derive_filename("My Cool App!", 3, "png"), "my-cool-app-3.png");
    }

    #[test]
    fn filename_collapses_separator_runs() {
        assert_eq!(derive_filename("  --Alpha__  Beta--  ", 1, "jpg"), "alpha-beta-1.jpg");
    }

    #[test]
    fn symbol_only_name_falls_back() {
        assert_eq!(derive_filename("!!!", 2, "gif"), "project-2.gif");
        assert_eq!(derive_filename("", 1, "png"), "project-1.png");
    }

    #[test]
    fn url_is_plain_concatenation() {
        assert_eq!(
            derive_url("/static/", "public/images/projects/x-1.png"),
            "/static/public/images/projects/x-1.png"
        );
        assert_eq!(derive_url("/static//", "/x-1.png"), "/static///x-1.png");
    }

    #[test]
    fn ordinal_counts_from_one() {
        assert_eq!(ordinal_after(0), 1);
        assert_eq!(ordinal_after(3), 4);
    }

    #[test]
    fn upload_path_adds_separator_only_when_missing() {
        assert_eq!(upload_path("public/images/projects/", "a-1.png"), "public/images/projects/a-1.png");
        assert_eq!(upload_path("uploads", "a-1.png"), "uploads/a-1.png");
        assert_eq!(upload_path("", "a-1.png"), "a-1.png");
    }

    #[test]
    fn extension_comes_from_last_dot() {
        assert_eq!(upload_extension("photo.final.JPG", &[]), "JPG");
    }

    #[test]
    fn extension_without_dot_is_sniffed_then_falls_back_to_name() {
        assert_eq!(upload_extension("screenshot", &PNG_MAGIC), "png");
        assert_eq!(upload_extension("README", b"plain text"), "README");
    }

    #[test]
    fn extension_ignores_directory_components() {
        assert_eq!(upload_extension("shot./nested/evil", &[]), "evil");
        assert_eq!(upload_extension("shot./nested/evil", &PNG_MAGIC), "png");
        assert_eq!(upload_extension("C:\\Users\\me\\cat.jpeg", &[]), "jpeg");
        assert_eq!(upload_extension("../../etc/passwd.d/", &PNG_MAGIC), "png");
    }
}
