use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::LayoutTree;

/// Source and sink for the live layout.
pub trait LayoutProvider {
    fn layout_tree(&self) -> Result<LayoutTree>;

    /// Commit `tree` as the new live layout. Implementations either apply the
    /// whole tree or fail without partial effects.
    fn set_layout_tree(&mut self, tree: &LayoutTree) -> Result<()>;
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pane-balance")
}

pub fn default_layout_path() -> PathBuf {
    data_dir().join("layout.json")
}

/// Layout stored as the host's JSON layout document.
#[derive(Clone, Debug)]
pub struct FileLayoutProvider {
    path: PathBuf,
}

impl FileLayoutProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutProvider for FileLayoutProvider {
    fn layout_tree(&self) -> Result<LayoutTree> {
        load_from(&self.path)
    }

    fn set_layout_tree(&mut self, tree: &LayoutTree) -> Result<()> {
        save_to(tree, &self.path)
    }
}

pub fn load_from(path: &Path) -> Result<LayoutTree> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading layout from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing layout in {}", path.display()))
}

/// Write through a sibling temp file and rename it over `path`, so readers
/// never observe a half-written document.
pub fn save_to(tree: &LayoutTree, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(tree)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "layout written");
    Ok(())
}

/// In-memory layout, counting how often it was written.
#[derive(Clone, Debug)]
pub struct MemoryLayoutProvider {
    tree: LayoutTree,
    writes: usize,
}

impl MemoryLayoutProvider {
    pub fn new(tree: LayoutTree) -> Self {
        Self { tree, writes: 0 }
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LayoutProvider for MemoryLayoutProvider {
    fn layout_tree(&self) -> Result<LayoutTree> {
        Ok(self.tree.clone())
    }

    fn set_layout_tree(&mut self, tree: &LayoutTree) -> Result<()> {
        self.tree = tree.clone();
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutNode, Orientation};

    fn make_test_tree() -> LayoutTree {
        LayoutTree::new(
            Orientation::Vertical,
            vec![
                LayoutNode::composite(
                    Some(0.5),
                    vec![LayoutNode::leaf(0.25), LayoutNode::leaf(0.75)],
                ),
                LayoutNode::leaf(0.5),
            ],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let tree = make_test_tree();

        save_to(&tree, &path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, tree);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("layout.json");
        save_to(&make_test_tree(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading layout"));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, "{ invalid }").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing layout"));
    }

    #[test]
    fn test_load_host_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(
            &path,
            r#"{ "orientation": 0, "groups": [ { "size": 0.6 }, { "size": 0.4, "groups": [ {}, {} ] } ] }"#,
        )
        .unwrap();
        let tree = load_from(&path).unwrap();
        assert_eq!(tree.orientation, Orientation::Horizontal);
        assert_eq!(tree.groups[1].children.len(), 2);
    }

    #[test]
    fn test_file_provider_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = FileLayoutProvider::new(dir.path().join("layout.json"));
        let mut tree = make_test_tree();
        provider.set_layout_tree(&tree).unwrap();

        tree.groups[1].size = Some(0.3);
        provider.set_layout_tree(&tree).unwrap();
        assert_eq!(provider.layout_tree().unwrap().groups[1].size, Some(0.3));
    }

    #[test]
    fn test_memory_provider_counts_writes() {
        let mut provider = MemoryLayoutProvider::new(make_test_tree());
        assert_eq!(provider.writes(), 0);
        let tree = provider.layout_tree().unwrap();
        provider.set_layout_tree(&tree).unwrap();
        assert_eq!(provider.writes(), 1);
        assert_eq!(provider.tree(), &tree);
    }

    #[test]
    fn test_default_layout_path_is_json() {
        let path = default_layout_path();
        assert!(path.ends_with("pane-balance/layout.json"));
    }
}
