//! Loads project configuration from a `postpages.yaml` file. Every key has a
//! default, so a project only needs to mention what it changes.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The name of the project file searched for by [`Config::from_directory`].
pub const PROJECT_FILE: &str = "postpages.yaml";

/// The extra page built alongside the posts unless the project says
/// otherwise.
pub const DSG_PAGE_PATH: &str = "/using-dsg";

#[derive(Deserialize)]
#[serde(default)]
struct Project {
    content_type: String,
    base_path: String,
    slug_field: String,
    source_directory: PathBuf,
    post_template: PathBuf,
    extra_pages: Vec<ExtraPage>,
}

impl Default for Project {
    fn default() -> Self {
        let site = SiteConfig::default();
        Project {
            content_type: site.content_type,
            base_path: site.base_path,
            slug_field: site.slug_field,
            source_directory: PathBuf::from("content"),
            post_template: site.post_template,
            extra_pages: site.extra_pages,
        }
    }
}

/// A page which isn't driven by content nodes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExtraPage {
    pub path: String,
    pub component: PathBuf,
    #[serde(default)]
    pub defer: bool,
}

/// The identifiers shared by the slug assigner and the page enumerator.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    /// The type tag of the nodes that get slugs and pages.
    pub content_type: String,

    /// The base segment slugs are rooted at.
    pub base_path: String,

    /// The field key the slug is stored under.
    pub slug_field: String,

    /// The template for content pages.
    pub post_template: PathBuf,

    /// Pages emitted after the content pages, in order.
    pub extra_pages: Vec<ExtraPage>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            content_type: String::from("MarkdownRemark"),
            base_path: String::from("posts"),
            slug_field: String::from("slug"),
            post_template: PathBuf::from("src/templates/blog-post.js"),
            extra_pages: vec![ExtraPage {
                path: String::from(DSG_PAGE_PATH),
                component: PathBuf::from("src/templates/using-dsg.js"),
                defer: true,
            }],
        }
    }
}

/// The fully-resolved configuration for a build.
#[derive(Clone, Debug)]
pub struct Config {
    /// The directory holding the project file.
    pub project_root: PathBuf,

    /// The directory content files are ingested from.
    pub source_directory: PathBuf,

    pub site: SiteConfig,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a project file and
    /// loads the first one found. Relative directories are resolved first so
    /// that `.` reaches the real parents.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let dir = std::fs::canonicalize(dir).map_err(|err| Error::Open {
            path: dir.to_owned(),
            err,
        })?;
        let mut current = Some(dir.as_path());
        while let Some(dir) = current {
            let path = dir.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path);
            }
            current = dir.parent();
        }
        Err(Error::NotFound(dir))
    }

    /// Loads a project file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = match contents.trim().is_empty() {
            true => Project::default(),
            false => serde_yaml::from_str(&contents).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            })?,
        };
        let project_root = path
            .parent()
            .ok_or_else(|| Error::NoParent(path.to_owned()))?
            .to_owned();

        Ok(Config {
            source_directory: project_root.join(&project.source_directory),
            site: SiteConfig {
                content_type: project.content_type,
                base_path: project.base_path,
                slug_field: project.slug_field,
                post_template: project_root.join(&project.post_template),
                extra_pages: project
                    .extra_pages
                    .into_iter()
                    .map(|page| ExtraPage {
                        component: project_root.join(&page.component),
                        ..page
                    })
                    .collect(),
            },
            project_root,
        })
    }
}

/// The result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when no project file exists in a directory or its ancestors.
    #[error("could not find `{}` in `{}` or any parent directory", PROJECT_FILE, .0.display())]
    NotFound(PathBuf),

    /// Returned when the project file, or the directory searched for it,
    /// can't be read.
    #[error("opening `{}`: {err}", .path.display())]
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML for a project.
    #[error("parsing project file `{}`: {err}", .path.display())]
    Parse {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the project file path has no parent directory.
    #[error("can't get parent directory for project file `{}`", .0.display())]
    NoParent(PathBuf),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_project_file_uses_defaults() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(PROJECT_FILE), "")?;
        let root = std::fs::canonicalize(dir.path())?;
        let config = Config::from_directory(dir.path())?;

        assert_eq!(root.join("content"), config.source_directory);
        assert_eq!("MarkdownRemark", config.site.content_type);
        assert_eq!("posts", config.site.base_path);
        assert_eq!("slug", config.site.slug_field);
        assert_eq!(
            root.join("src/templates/blog-post.js"),
            config.site.post_template
        );
        assert_eq!(1, config.site.extra_pages.len());
        assert_eq!(DSG_PAGE_PATH, config.site.extra_pages[0].path);
        assert!(config.site.extra_pages[0].defer);
        Ok(())
    }

    #[test]
    fn test_found_in_parent_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "base_path: articles\nextra_pages:\n  - path: /about\n    component: about.js\n",
        )?;
        let nested = dir.path().join("content").join("2023");
        std::fs::create_dir_all(&nested)?;

        let root = std::fs::canonicalize(dir.path())?;
        let config = Config::from_directory(&nested)?;
        assert_eq!(root, config.project_root);
        assert_eq!("articles", config.site.base_path);
        assert_eq!(
            vec![ExtraPage {
                path: String::from("/about"),
                component: root.join("about.js"),
                defer: false,
            }],
            config.site.extra_pages,
        );
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(PROJECT_FILE), "extra_pages: 12\n")?;
        assert!(matches!(
            Config::from_directory(dir.path()),
            Err(Error::Parse { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        match Config::from_directory(&missing) {
            Err(Error::Open { path, .. }) => assert_eq!(missing, path),
            other => panic!("wanted an open error, got {:?}", other.map(|_| ())),
        }
        Ok(())
    }
}
