//! Output composition.
//!
//! Substitutes the rendered statement block into the skeleton at the fixed
//! marker and writes the result. The write goes through a temporary file in
//! the destination directory that is renamed into place on success, so a
//! failed run never leaves partial output behind.

use crate::error::{Error, Result};
use std::io::Write;
use std::path::Path;

/// The substitution marker the skeleton must contain.
pub const MARKER: &str = "@CONFIG_INIT_FUNC@";

/// Replace the first marker occurrence with the statement block.
///
/// Marker uniqueness is not validated: if the marker appears more than once,
/// only the first occurrence is substituted.
pub fn substitute(skeleton: &str, block: &str, skeleton_path: &Path) -> Result<String> {
    if !skeleton.contains(MARKER) {
        return Err(Error::MarkerNotFound {
            path: skeleton_path.to_path_buf(),
            marker: MARKER.to_string(),
        });
    }

    Ok(skeleton.replacen(MARKER, block, 1))
}

/// Write `contents` to `path` via a temporary file and rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| Error::io(path, e))?;
    temp.persist(path).map_err(|e| Error::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_substitute_replaces_marker() {
        let skeleton = "void init() {@CONFIG_INIT_FUNC@}";
        let result =
            substitute(skeleton, "\n    body();\n", Path::new("skeleton.cpp")).expect("marker present");
        assert_eq!(result, "void init() {\n    body();\n}");
    }

    #[test]
    fn test_substitute_first_occurrence_only() {
        let skeleton = "@CONFIG_INIT_FUNC@ and @CONFIG_INIT_FUNC@";
        let result = substitute(skeleton, "X", Path::new("skeleton.cpp")).expect("marker present");
        assert_eq!(result, "X and @CONFIG_INIT_FUNC@");
    }

    #[test]
    fn test_substitute_missing_marker() {
        let err = substitute("no marker here", "X", Path::new("skeleton.cpp")).unwrap_err();
        assert!(matches!(err, Error::MarkerNotFound { .. }));
    }

    #[test]
    fn test_write_atomic_creates_and_overwrites() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("out.cpp");

        write_atomic(&target, "first").expect("first write");
        assert_eq!(fs::read_to_string(&target).expect("read back"), "first");

        write_atomic(&target, "second").expect("overwrite");
        assert_eq!(fs::read_to_string(&target).expect("read back"), "second");
    }
}
