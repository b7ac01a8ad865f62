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
use std::sync::Arc;

use crate::context::{Context, Env};
use crate::error::Error;
use crate::graph::Graph;
use crate::output::BuildOutput;
use crate::project::Project;
use crate::unit::UnitFactory;
use crate::workspace::{CwdGuard, Workspace};

/// Performs a single depth-first, successors-first, memoized build
/// traversal rooted at one target.
///
/// A fresh `Builder` is constructed for every call to
/// [`Project::build`](crate::Project::build); it is not re-entrant and
/// builds each target at most once over its lifetime.
pub struct Builder {
    project: Arc<dyn Project>,
    env: Env,
    graph: Graph<String>,
    workspace: Workspace,
    deployables: HashMap<String, UnitFactory>,
    outputs: HashMap<String, BuildOutput>,
}

impl Builder {
    pub fn new(project: Arc<dyn Project>) -> Result<Builder, Error> {
        let graph = project.dependency_graph()?;
        let env = project.load_env(project.env().clone())?;
        let workspace = Workspace::new(project.project_dir());
        let deployables = project.deployables();

        Ok(Builder {
            project,
            env,
            graph,
            workspace,
            deployables,
            outputs: HashMap::new(),
        })
    }

    /// Builds `root` and everything it transitively depends on, returning
    /// `root`'s build output.
    pub fn build(&mut self, root: &str) -> Result<BuildOutput, Error> {
        self.visit(root)?;

        // `visit` guarantees `root` is present in `outputs` on success.
        Ok(self.outputs[root].clone())
    }

    /// Ensures `target` and all of its successors have been built, in
    /// successors-first order, memoizing each target's output so that a
    /// target reachable via multiple paths (e.g. the bottom of a diamond)
    /// is only ever built once.
    fn visit(&mut self, target: &str) -> Result<(), Error> {
        if self.outputs.contains_key(target) {
            return Ok(());
        }

        let successors: Vec<String> = self
            .graph
            .successors(&target.to_owned())?
            .into_iter()
            .cloned()
            .collect();

        let mut input = HashMap::new();

        for dep in &successors {
            self.visit(dep)?;
            input.insert(dep.clone(), self.outputs[dep].clone());
        }

        // A target reachable via more than one path (the bottom of a
        // diamond) may have already been built while visiting a sibling
        // branch above.
        if self.outputs.contains_key(target) {
            return Ok(());
        }

        let output = self.build_one(target, input)?;
        self.outputs.insert(target.to_owned(), output);

        Ok(())
    }

    fn build_one(
        &self,
        target: &str,
        input: HashMap<String, BuildOutput>,
    ) -> Result<BuildOutput, Error> {
        let factory = self.deployables.get(target).ok_or_else(|| {
            Error::config(format!(
                "no deployable registered for target '{}'",
                target
            ))
        })?;

        let build_dir = self.workspace.make_build_dir(target)?;
        let build_output_dir = self.workspace.make_build_output_dir(target)?;
        let destroy_dir = self.workspace.destroy_dir(target);

        let ctx = Context::new(
            self.project.clone(),
            self.env.clone(),
            input,
            build_dir.clone(),
            build_output_dir,
            destroy_dir,
        );

        let mut unit = factory(ctx);

        {
            let _cwd = CwdGuard::enter(&build_dir)?;

            if unit.is_build_outdated()? {
                log::info!("building '{}'", target);
                unit.build()?;
            } else {
                log::info!("'{}' is up to date", target);
            }
        }

        unit.get_build_output()
    }
}
