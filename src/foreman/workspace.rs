// Copyright (c) 2018 Jason White
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! Per-target filesystem layout under the project's temp root:
//!
//! ```text
//! <project_dir>/tmp/build/<target>/            transient, cleared each build
//! <project_dir>/tmp/build-output/<target>/      persistent, cleared on destroy
//! <project_dir>/tmp/destroy/<target>/           transient, cleared each destroy
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Owns the workspace directory layout for a single project.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// The workspace rooted at `<project_dir>/tmp`.
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Workspace {
        Workspace {
            root: project_dir.into().join("tmp"),
        }
    }

    /// Ensures `target`'s build dir exists and is empty, then returns its
    /// path. Invoked at the start of each build of `target`.
    pub fn make_build_dir(&self, target: &str) -> Result<PathBuf, Error> {
        self.make_clean_dir(self.build_dir(target))
    }

    /// Ensures `target`'s build-output dir exists, never clearing any
    /// contents that may already be there.
    pub fn make_build_output_dir(&self, target: &str) -> Result<PathBuf, Error> {
        let dir = self.build_output_dir(target);
        ensure_dir(&dir)?;
        Ok(dir)
    }

    /// Ensures `target`'s destroy dir exists and is empty, then returns its
    /// path. Invoked at the start of each destroy of `target`.
    pub fn make_destroy_dir(&self, target: &str) -> Result<PathBuf, Error> {
        self.make_clean_dir(self.destroy_dir(target))
    }

    /// Recursively removes `target`'s build-output dir. Invoked after a
    /// successful destroy.
    pub fn clear_build_output(&self, target: &str) -> Result<(), Error> {
        remove_all(&self.build_output_dir(target))
    }

    pub fn build_dir(&self, target: &str) -> PathBuf {
        self.root.join("build").join(target)
    }

    pub fn build_output_dir(&self, target: &str) -> PathBuf {
        self.root.join("build-output").join(target)
    }

    pub fn destroy_dir(&self, target: &str) -> PathBuf {
        self.root.join("destroy").join(target)
    }

    fn make_clean_dir(&self, dir: PathBuf) -> Result<PathBuf, Error> {
        remove_all(&dir)?;
        ensure_dir(&dir)?;
        Ok(dir)
    }
}

/// Removes `path` if it exists, whether it is a file or a directory. A
/// path that exists as a file where a directory is expected must be
/// removed before the directory can be created in its place.
fn remove_all(path: &Path) -> Result<(), Error> {
    match fs::symlink_metadata(path) {
        Ok(meta) => {
            if meta.is_dir() {
                fs::remove_dir_all(path)?;
            } else {
                fs::remove_file(path)?;
            }
            Ok(())
        }
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn ensure_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Temporarily changes the process working directory, restoring the
/// original directory when dropped -- including on an early return or a
/// panic unwind. This is the only globally visible side effect the engine
/// performs beyond filesystem writes, so it is scoped as narrowly as
/// possible: to the duration of a single unit's build or destroy step.
pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Result<CwdGuard, Error> {
        let original = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(CwdGuard { original })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        // Best-effort: there is nowhere left to report a failure to restore
        // the working directory from a `Drop` impl, so it is logged instead
        // of propagated.
        if let Err(err) = env::set_current_dir(&self.original) {
            log::error!(
                "failed to restore working directory to {:?}: {}",
                self.original,
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn make_build_dir_is_idempotent_and_always_empty() {
        let project = tempdir().unwrap();
        let ws = Workspace::new(project.path());

        let dir = ws.make_build_dir("a").unwrap();
        fs::write(dir.join("log"), b"first run").unwrap();
        assert!(dir.join("log").exists());

        let dir = ws.make_build_dir("a").unwrap();
        assert!(!dir.join("log").exists());
        assert!(fs::read_dir(&dir).unwrap().next().is_none());
    }

    #[test]
    fn make_build_output_dir_never_clears() {
        let project = tempdir().unwrap();
        let ws = Workspace::new(project.path());

        let dir = ws.make_build_output_dir("a").unwrap();
        fs::write(dir.join("output.json"), b"{}").unwrap();

        let dir = ws.make_build_output_dir("a").unwrap();
        assert!(dir.join("output.json").exists());
    }

    #[test]
    fn clear_build_output_removes_the_directory() {
        let project = tempdir().unwrap();
        let ws = Workspace::new(project.path());

        let dir = ws.make_build_output_dir("a").unwrap();
        fs::write(dir.join("output.json"), b"{}").unwrap();

        ws.clear_build_output("a").unwrap();
        assert!(!dir.exists());

        // A second clear on an already-cleared directory is a no-op.
        ws.clear_build_output("a").unwrap();
    }

    #[test]
    fn make_build_dir_replaces_a_file_in_its_place() {
        let project = tempdir().unwrap();
        let ws = Workspace::new(project.path());

        let parent = project.path().join("tmp").join("build");
        fs::create_dir_all(&parent).unwrap();
        fs::write(parent.join("a"), b"oops, a file").unwrap();

        let dir = ws.make_build_dir("a").unwrap();
        assert!(dir.is_dir());
    }
}
