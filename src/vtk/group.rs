//! Time-series collection index (`.pvd`).
//!
//! A collection lists dataset files together with a simulation time, an
//! informational group name and a part number. File paths are stored relative
//! to the directory of the collection file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::append_extension;
use super::constants::{COLLECTION_EXTENSION, COLLECTION_VERSION, ROOT_TAG};
use crate::util::{Endianness, Result};
use crate::xml::{OStream, XmlWriter};

const COLLECTION_TAG: &str = "Collection";
const DATASET_TAG: &str = "DataSet";

/// Writer for a `.pvd` collection file.
pub struct VtkGroup {
    xml: XmlWriter<BufWriter<File>>,
    path: PathBuf,
    root: PathBuf,
    entries: usize,
}

impl VtkGroup {
    /// Create `path` + `.pvd`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = append_extension(path.as_ref(), COLLECTION_EXTENSION);
        let root = absolute_or_self(path.parent().unwrap_or(Path::new("")));

        let mut xml = XmlWriter::new(OStream::create(&path)?, true)?;
        xml.open_element(ROOT_TAG)?
            .add_attribute("type", "Collection")?
            .add_attribute("version", COLLECTION_VERSION)?
            .add_attribute("byte_order", Endianness::native().name())?;
        xml.open_element(COLLECTION_TAG)?;

        debug!(path = %path.display(), "creating collection");
        Ok(Self { xml, path, root, entries: 0 })
    }

    /// Path of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of datasets added so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Add a dataset file at simulation time `sim_time`.
    pub fn add_file(
        &mut self,
        file: impl AsRef<Path>,
        sim_time: f64,
        group: &str,
        part: u32,
    ) -> Result<&mut Self> {
        let relative = relative_to(&absolute_or_self(file.as_ref()), &self.root);
        let relative = relative.to_string_lossy().replace('\\', "/");

        self.xml
            .open_element(DATASET_TAG)?
            .add_attribute("timestep", format!("{sim_time:?}"))?
            .add_attribute("group", group)?
            .add_attribute("part", part)?
            .add_attribute("file", &relative)?
            .close_empty()?;
        self.entries += 1;
        Ok(self)
    }

    /// Close the collection; returns the path of the written file.
    pub fn save(mut self) -> Result<PathBuf> {
        self.xml.close_element(COLLECTION_TAG)?;
        self.xml.close_element(ROOT_TAG)?;
        self.xml.into_inner()?;
        debug!(path = %self.path.display(), datasets = self.entries, "saved collection");
        Ok(self.path)
    }
}

fn absolute_or_self(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() { Path::new(".") } else { path };
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lexical relative path from `base` to `path`; both should be absolute.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path: Vec<Component> = normalized(path);
    let base: Vec<Component> = normalized(base);
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    if common == 0 && !base.is_empty() {
        // Different roots (e.g. other drive); keep the full path.
        return path.iter().collect();
    }

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for c in &path[common..] {
        out.push(c.as_os_str());
    }
    out
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component> = Vec::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths() {
        let base = Path::new("/data/run");
        assert_eq!(relative_to(Path::new("/data/run/a.vtu"), base), PathBuf::from("a.vtu"));
        assert_eq!(
            relative_to(Path::new("/data/run/steps/b.vtu"), base),
            PathBuf::from("steps/b.vtu")
        );
        assert_eq!(relative_to(Path::new("/data/other/c.vtu"), base), PathBuf::from("../other/c.vtu"));
        assert_eq!(relative_to(Path::new("/data/run/./x/../d.vtr"), base), PathBuf::from("d.vtr"));
    }

    #[test]
    fn test_collection_document() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut group = VtkGroup::create(dir.path().join("series"))?;
        group.add_file(dir.path().join("sim_0.vtu"), 0.0, "", 0)?;
        group.add_file(dir.path().join("steps").join("sim_1.vtu"), 0.5, "fluid", 1)?;
        assert_eq!(group.len(), 2);
        let path = group.save()?;

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pvd"));
        let text = std::fs::read_to_string(&path)?;
        let expected_root = format!(
            "<?xml version=\"1.0\"?>\n<VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"{}\">\n<Collection>",
            Endianness::native().name()
        );
        assert!(text.starts_with(&expected_root));
        assert!(text.contains(
            "\n<DataSet timestep=\"0.0\" group=\"\" part=\"0\" file=\"sim_0.vtu\"/>"
        ));
        assert!(text.contains(
            "\n<DataSet timestep=\"0.5\" group=\"fluid\" part=\"1\" file=\"steps/sim_1.vtu\"/>"
        ));
        assert!(text.ends_with("\n</Collection>\n</VTKFile>"));
        Ok(())
    }
}
