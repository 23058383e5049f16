use std::path::{Path, PathBuf};

/// Replace path separators and colons with `_` so the result can be used as
/// a single path segment on common filesystems. Idempotent.
pub fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

/// Directory a file from `folder` is saved into.
pub fn folder_path(destination: &Path, folder: &str) -> PathBuf {
    destination.join(sanitize_segment(folder))
}

/// `<destination>/<folder>/<filename>`
pub fn local_download_path(destination: &Path, folder: &str, filename: &str) -> PathBuf {
    folder_path(destination, folder).join(sanitize_segment(filename))
}

/// Sibling path the body is streamed into before being renamed into place.
pub fn part_path(download_path: &Path) -> PathBuf {
    let mut name = download_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    download_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_segment_replaces_separators() {
        assert_eq!(sanitize_segment("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_segment("plain name.txt"), "plain name.txt");
        assert_eq!(sanitize_segment(""), "");
    }

    #[test]
    fn test_sanitize_segment_idempotent() {
        for s in [
            "2019-04-01T12:30:05 - bob - x/y.png",
            "::\\//",
            "résumé:final.pdf",
            "already_clean",
        ] {
            let once = sanitize_segment(s);
            assert_eq!(sanitize_segment(&once), once);
        }
    }

    #[test]
    fn test_sanitize_segment_keeps_unicode() {
        assert_eq!(sanitize_segment("日本:語"), "日本_語");
    }

    #[test]
    fn test_local_download_path() {
        let path = local_download_path(Path::new("/srv/archive"), "general", "a - b - c.txt");
        assert_eq!(path, PathBuf::from("/srv/archive/general/a - b - c.txt"));
    }

    #[test]
    fn test_local_download_path_single_segment_per_part() {
        let path = local_download_path(Path::new("/srv"), "x/y", "../evil");
        assert_eq!(path, PathBuf::from("/srv/x_y/.._evil"));
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/srv/general/report.pdf")),
            PathBuf::from("/srv/general/report.pdf.part")
        );
    }
}
