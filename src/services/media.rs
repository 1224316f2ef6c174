use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Writes uploaded product pictures under a fixed media directory and hands
/// out the relative filename that gets stored on the product row. Serving
/// the files back is `ServeDir`'s job.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist uploaded bytes under a sanitized version of the client's
    /// filename. An upload with the same name overwrites the previous file,
    /// matching how picture replacement works on product updates.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let Some(filename) = sanitize_filename(original_name) else {
            bail!("unusable upload filename: {original_name:?}");
        };

        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .await
                .with_context(|| format!("Failed to create media dir {}", self.root.display()))?;
        }

        let file_path = self.root.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", file_path.display()))?;

        info!(path = %file_path.display(), size = bytes.len(), "Stored media file");

        Ok(filename)
    }
}

/// Reduce a client-supplied filename to something safe to join onto the
/// media root: final path component only, ASCII alphanumerics plus `.`,
/// `-` and `_`, never starting with a dot.
#[must_use]
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => Some(c),
            ' ' => Some('_'),
            _ => None,
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(sanitize_filename("mug.png"), Some("mug.png".to_string()));
    }

    #[test]
    fn strips_directories_and_traversal() {
        assert_eq!(
            sanitize_filename("../../etc/passwd"),
            Some("passwd".to_string())
        );
        assert_eq!(
            sanitize_filename("uploads\\..\\shadow.png"),
            Some("shadow.png".to_string())
        );
    }

    #[test]
    fn replaces_spaces_and_drops_oddities() {
        assert_eq!(
            sanitize_filename("my mug (1).png"),
            Some("my_mug_1.png".to_string())
        );
    }

    #[test]
    fn rejects_names_with_nothing_left() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("///"), None);
    }
}
