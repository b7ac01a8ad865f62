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

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::Builder;
use crate::context::Env;
use crate::destroyer::Destroyer;
use crate::error::Error;
use crate::graph::{Dependencies, Graph};
use crate::output::BuildOutput;
use crate::unit::UnitFactory;

/// A loaded, validated project: a named set of deployable targets, their
/// dependency edges, and the environment they build against.
///
/// Implementations are produced by a project's configuration file, not
/// written by hand; see [`crate::loader`]. The engine only ever interacts
/// with a project through this trait, never through the concrete type the
/// loader happens to construct.
pub trait Project: Send + Sync {
    /// The directory the project's configuration file was loaded from. The
    /// workspace's temp root is nested under this directory.
    fn project_dir(&self) -> PathBuf;

    /// The project's raw environment, as declared by the project
    /// configuration. [`load_env`](Project::load_env) validates and
    /// normalizes it once, at `Builder`/`Destroyer` construction time,
    /// before any unit sees it.
    fn env(&self) -> &Env;

    /// The full set of deployable targets, each mapped to a factory that
    /// constructs a fresh [`Unit`](crate::Unit) for it given a
    /// [`Context`](crate::Context).
    fn deployables(&self) -> HashMap<String, UnitFactory>;

    /// The dependency edges between targets, keyed by dependent, valued by
    /// the target(s) it depends on.
    fn dependencies(&self) -> HashMap<String, Dependencies<String>>;

    /// The target `build`/`destroy` operate on when none is named
    /// explicitly.
    fn default_build_target(&self) -> Option<String> {
        None
    }

    /// Validates and normalizes a raw environment read by the loader, before
    /// it is handed to any unit. Defaults to passing `raw` through
    /// unchanged; a project overrides this to enforce required keys or
    /// reject malformed values, failing with [`Error::Config`].
    fn load_env(&self, raw: Env) -> Result<Env, Error> {
        Ok(raw)
    }

    /// Builds the dependency graph from [`deployables`](Project::deployables)
    /// and [`dependencies`](Project::dependencies), failing if an edge names
    /// an unknown target or the edges contain a cycle.
    fn dependency_graph(&self) -> Result<Graph<String>, Error> {
        let nodes = self.deployables().into_keys();
        Graph::new(nodes, self.dependencies())
    }

    /// Builds `target` (or the project's default target, if any) and
    /// everything it transitively depends on.
    ///
    /// Takes `self: Arc<Self>` rather than `&self` because building requires
    /// handing the project's own `Arc<dyn Project>` down into each unit's
    /// [`Context`](crate::Context); a plain `&self` borrow can't produce
    /// that without an extra, redundant `Arc::new` wrapping an existing
    /// `Arc`'s referent. Still callable as `project.build(None)` on any
    /// `Arc<dyn Project>`.
    fn build(self: Arc<Self>, target: Option<&str>) -> Result<BuildOutput, Error> {
        let target = resolve_target(&*self, target)?;
        let mut builder = Builder::new(self)?;
        builder.build(&target)
    }

    /// Destroys `target` and everything that transitively depends on it, or,
    /// if `target` is `None`, every target in the project.
    fn destroy(self: Arc<Self>, target: Option<&str>) -> Result<(), Error> {
        let mut destroyer = Destroyer::new(self)?;

        match target {
            Some(target) => destroyer.destroy(target),
            None => destroyer.destroy_all(),
        }
    }
}

fn resolve_target(
    project: &dyn Project,
    target: Option<&str>,
) -> Result<String, Error> {
    target
        .map(str::to_owned)
        .or_else(|| project.default_build_target())
        .ok_or_else(|| {
            Error::config(
                "no target given and the project declares no default build \
                 target",
            )
        })
}
