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

//! Loads a project from its configuration file.
//!
//! A real deployment would point this at a scripting engine that evaluates
//! a project's config file and calls a well-known entry point in it. Rather
//! than fabricate a scripting dependency this crate does not otherwise need,
//! [`ConfigRegistry`] plays that entry point's role directly: a project
//! registers a factory under the path its config file would live at, and
//! [`load_config`] enforces the same two failure modes a real loader would
//! hit -- a config file with no entry point, and an entry point that does
//! not produce a project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;
use crate::project::Project;

/// Constructs a project, or fails to. Stands in for evaluating a config
/// file's `get_project()` entry point.
pub type ProjectFactory =
    Box<dyn Fn() -> Option<Arc<dyn Project>> + Send + Sync>;

/// A registry of project factories keyed by config file path.
///
/// This is the loader's only state. In the real tool this role is played by
/// a scripting runtime that imports the config file as a module; here, a
/// caller registers the equivalent of that module's `get_project()` ahead of
/// time.
#[derive(Default)]
pub struct ConfigRegistry {
    factories: HashMap<PathBuf, ProjectFactory>,
}

impl ConfigRegistry {
    pub fn new() -> ConfigRegistry {
        ConfigRegistry {
            factories: HashMap::new(),
        }
    }

    /// Registers the `get_project()` equivalent for `path`.
    pub fn register<P, F>(&mut self, path: P, factory: F)
    where
        P: Into<PathBuf>,
        F: Fn() -> Option<Arc<dyn Project>> + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Box::new(factory));
    }

    /// Loads the project registered for `path`.
    ///
    /// Fails with [`Error::Config`] if `path` has no registered factory
    /// (`Missing get_project() in '<path>'`), or if the factory declines to
    /// produce a project (`get_project() from '<path>' did not return
    /// Project instance`).
    pub fn load_config<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Arc<dyn Project>, Error> {
        let path = path.as_ref();

        let factory = self.factories.get(path).ok_or_else(|| {
            Error::config(format!(
                "Missing get_project() in '{}'",
                path.display()
            ))
        })?;

        factory().ok_or_else(|| {
            Error::config(format!(
                "get_project() from '{}' did not return Project instance",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Env;
    use crate::graph::Dependencies;
    use crate::unit::UnitFactory;
    use std::path::PathBuf;

    #[derive(Default)]
    struct StubProject {
        env: Env,
    }

    impl Project for StubProject {
        fn project_dir(&self) -> PathBuf {
            PathBuf::from("/tmp")
        }

        fn env(&self) -> &Env {
            &self.env
        }

        fn deployables(&self) -> HashMap<String, UnitFactory> {
            HashMap::new()
        }

        fn dependencies(&self) -> HashMap<String, Dependencies<String>> {
            HashMap::new()
        }
    }

    #[test]
    fn missing_factory_reports_missing_get_project() {
        let registry = ConfigRegistry::new();

        let err = registry
            .load_config("/tmp/some-project/config.py")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Missing get_project()"));
        assert!(msg.contains("config.py"));
    }

    #[test]
    fn factory_returning_none_reports_did_not_return_project() {
        let mut registry = ConfigRegistry::new();
        registry.register("/tmp/some-project/config.py", || None);

        let err = registry
            .load_config("/tmp/some-project/config.py")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("did not return Project instance"));
        assert!(msg.contains("config.py"));
    }

    #[test]
    fn factory_returning_a_project_succeeds() {
        let mut registry = ConfigRegistry::new();
        registry.register("/tmp/some-project/config.py", || {
            Some(Arc::new(StubProject::default()) as Arc<dyn Project>)
        });

        assert!(registry.load_config("/tmp/some-project/config.py").is_ok());
    }
}
