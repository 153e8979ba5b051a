//! Location Mapper
//!
//! Turns the file paths Doxygen writes into project relative paths and
//! include directives.

use crate::error::{ApiError, Result};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Path conversions the parser needs.
pub trait PathMapper {
    /// Path relative to the project root, `/`-separated. Fails for paths
    /// outside the root.
    fn to_project_relative_path(&self, path: &str) -> Result<String>;

    /// Path relative to the first include root containing it, or `None`.
    fn to_include_directive(&self, path: &str) -> Option<String>;
}

/// [`PathMapper`] over a project root and a list of include roots.
#[derive(Debug, Clone)]
pub struct LocationMapper {
    project_root: PathBuf,
    include_paths: Vec<PathBuf>,
}

impl LocationMapper {
    /// A relative `project_root` is taken relative to the working directory,
    /// relative include roots relative to the project root.
    pub fn new(project_root: impl Into<PathBuf>, include_paths: Vec<PathBuf>) -> Result<Self> {
        let project_root = normalize(&absolute(&project_root.into())?);
        let include_paths = include_paths
            .iter()
            .map(|include| normalize(&project_root.join(include)))
            .collect();
        Ok(Self {
            project_root,
            include_paths,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Relative input is taken relative to the project root.
    fn expand(&self, path: &str) -> PathBuf {
        normalize(&self.project_root.join(path))
    }
}

impl PathMapper for LocationMapper {
    fn to_project_relative_path(&self, path: &str) -> Result<String> {
        let expanded = self.expand(path);
        relative_to(&expanded, &self.project_root).ok_or_else(|| ApiError::PathOutsideProject {
            path: expanded.display().to_string(),
            root: self.project_root.display().to_string(),
        })
    }

    fn to_include_directive(&self, path: &str) -> Option<String> {
        let expanded = self.expand(path);
        self.include_paths
            .iter()
            .find_map(|include| relative_to(&expanded, include))
    }
}

fn relative_to(path: &Path, start: &Path) -> Option<String> {
    let relative = path.strip_prefix(start).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// `path` joined onto the working directory unless already absolute.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| ApiError::io(path, e))?;
    Ok(cwd.join(path))
}

/// Remove `.` and resolve `..` without touching the filesystem. A `..` with
/// nothing left to remove is kept, except directly below the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_directive_uses_first_matching_root() {
        let mapper = LocationMapper::new(
            "/tmp/project_a",
            vec![
                PathBuf::from("/tmp/project_b/src/"),
                PathBuf::from("/tmp/project_a/src/"),
            ],
        )
        .unwrap();

        assert_eq!(
            mapper
                .to_include_directive("/tmp/../tmp/project_a/./src/include/header.h")
                .as_deref(),
            Some("include/header.h")
        );
    }

    #[test]
    fn include_directive_is_none_outside_include_roots() {
        let mapper = LocationMapper::new("/tmp/project_a", vec![]).unwrap();
        assert_eq!(mapper.to_include_directive("/tmp/project_a/src/include/header.h"), None);

        let mapper =
            LocationMapper::new("/tmp/project_a", vec![PathBuf::from("/tmp/project_b/src")])
                .unwrap();
        assert_eq!(mapper.to_include_directive("/tmp/project_a/src/include/header.h"), None);
    }

    #[test]
    fn project_path_is_relative_to_root() {
        let mapper = LocationMapper::new("/tmp/project_a", vec![]).unwrap();
        assert_eq!(
            mapper
                .to_project_relative_path("/tmp/../tmp/project_a/./src/include/header.h")
                .unwrap(),
            "src/include/header.h"
        );
        assert_eq!(
            mapper.to_project_relative_path("src/coffee.h").unwrap(),
            "src/coffee.h"
        );
    }

    #[test]
    fn path_outside_root_is_an_error() {
        let mapper = LocationMapper::new("/tmp/project_a", vec![]).unwrap();
        assert!(matches!(
            mapper.to_project_relative_path("/tmp/project_b/helloworld.txt"),
            Err(ApiError::PathOutsideProject { .. })
        ));
    }

    #[test]
    fn sibling_with_common_prefix_is_outside() {
        let mapper = LocationMapper::new("/tmp/project", vec![]).unwrap();
        assert!(mapper.to_project_relative_path("/tmp/project_b/a.h").is_err());
    }

    #[test]
    fn relative_include_roots_resolve_against_project() {
        let mapper = LocationMapper::new("/tmp/project", vec![PathBuf::from("src")]).unwrap();
        assert_eq!(
            mapper.to_include_directive("src/coffee/coffee.h").as_deref(),
            Some("coffee/coffee.h")
        );
    }

    #[test]
    fn normalize_keeps_unresolvable_parents() {
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("docs/..")), PathBuf::new());
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn relative_root_resolves_against_working_directory() {
        let cwd = env::current_dir().unwrap();

        for root in [".", "docs/.."] {
            let mapper = LocationMapper::new(root, vec![]).unwrap();
            assert_eq!(mapper.project_root(), normalize(&cwd));
            assert_eq!(
                mapper
                    .to_project_relative_path(&cwd.join("src/coffee.h").display().to_string())
                    .unwrap(),
                "src/coffee.h"
            );
        }

        let mapper = LocationMapper::new(".", vec![]).unwrap();
        let outside = cwd.join("../elsewhere/coffee.h");
        assert!(matches!(
            mapper.to_project_relative_path(&outside.display().to_string()),
            Err(ApiError::PathOutsideProject { .. })
        ));
    }
}
