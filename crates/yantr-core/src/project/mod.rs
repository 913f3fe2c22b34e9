//! Target project layout and package.json helpers

pub mod package_json;

pub use package_json::{
    create_package_json, has_src_dir, is_node_project, package_name, sanitize_package_name,
};

use std::path::{Component, Path, PathBuf};

/// Directory that receives copied templates: `<project>/<srcDir>/lib/yantr`
pub fn yantr_dir(project_dir: &Path, src_dir: &str) -> PathBuf {
    join_relative(project_dir, src_dir).join("lib").join("yantr")
}

/// Join a config-style relative path (`./src`, `.`) onto the project root
pub fn join_relative(project_dir: &Path, relative: &str) -> PathBuf {
    let mut path = project_dir.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::CurDir => {}
            other => path.push(other.as_os_str()),
        }
    }
    path
}

/// Path relative to the project root for user-facing output
pub fn display_path(project_dir: &Path, path: &Path) -> String {
    path.strip_prefix(project_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
