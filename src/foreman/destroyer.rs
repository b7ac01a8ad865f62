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

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::context::{Context, Env};
use crate::error::Error;
use crate::graph::Graph;
use crate::output::BuildOutput;
use crate::project::Project;
use crate::unit::UnitFactory;
use crate::workspace::{CwdGuard, Workspace};

/// Performs a destroy traversal: predecessors-first for a single targeted
/// destroy, or full topological order for a whole-project destroy.
///
/// A fresh `Destroyer` is constructed for every call to
/// [`Project::destroy`](crate::Project::destroy); it is not re-entrant and
/// destroys each target at most once over its lifetime.
pub struct Destroyer {
    project: Arc<dyn Project>,
    env: Env,
    graph: Graph<String>,
    workspace: Workspace,
    deployables: HashMap<String, UnitFactory>,
    destroyed: HashSet<String>,
}

impl Destroyer {
    pub fn new(project: Arc<dyn Project>) -> Result<Destroyer, Error> {
        let graph = project.dependency_graph()?;
        let env = project.load_env(project.env().clone())?;
        let workspace = Workspace::new(project.project_dir());
        let deployables = project.deployables();

        Ok(Destroyer {
            project,
            env,
            graph,
            workspace,
            deployables,
            destroyed: HashSet::new(),
        })
    }

    /// Destroys every target that transitively depends on `target`, then
    /// `target` itself.
    pub fn destroy(&mut self, target: &str) -> Result<(), Error> {
        self.visit(target)
    }

    /// Destroys every target in the project, in an order that tears down
    /// every dependent before the dependencies it relies on.
    pub fn destroy_all(&mut self) -> Result<(), Error> {
        // `topological_order` is dependency-first (build order); destroy
        // needs the reverse, dependent-first.
        let order: Vec<String> = self
            .graph
            .topological_order()
            .into_iter()
            .rev()
            .cloned()
            .collect();

        for target in &order {
            self.destroy_one(target)?;
            self.destroyed.insert(target.clone());
        }

        Ok(())
    }

    fn visit(&mut self, target: &str) -> Result<(), Error> {
        if self.destroyed.contains(target) {
            return Ok(());
        }

        let predecessors: Vec<String> = self
            .graph
            .predecessors(&target.to_owned())?
            .into_iter()
            .cloned()
            .collect();

        for dependent in &predecessors {
            self.visit(dependent)?;
        }

        if self.destroyed.contains(target) {
            return Ok(());
        }

        self.destroy_one(target)?;
        self.destroyed.insert(target.to_owned());

        Ok(())
    }

    fn destroy_one(&self, target: &str) -> Result<(), Error> {
        let input = self.gather_successor_outputs(target)?;

        let factory = self.deployables.get(target).ok_or_else(|| {
            Error::config(format!(
                "no deployable registered for target '{}'",
                target
            ))
        })?;

        let destroy_dir = self.workspace.make_destroy_dir(target)?;
        let build_output_dir = self.workspace.build_output_dir(target);
        let build_dir = self.workspace.build_dir(target);

        let ctx = Context::new(
            self.project.clone(),
            self.env.clone(),
            input,
            build_dir,
            build_output_dir,
            destroy_dir.clone(),
        );

        let mut unit = factory(ctx);

        {
            let _cwd = CwdGuard::enter(&destroy_dir)?;
            log::info!("destroying '{}'", target);
            unit.destroy()?;
        }

        self.workspace.clear_build_output(target)?;

        Ok(())
    }

    /// Re-derives the input shape a unit saw during its build: the build
    /// output of each direct successor, re-instantiated fresh (no build is
    /// performed).
    ///
    /// A successor that was never built -- `Error::BuildNotFound` -- is
    /// tolerated and treated as an empty output for that key, per the
    /// best-effort policy in the destroy contract: a missing prior build
    /// does not block destroying its dependents.
    fn gather_successor_outputs(
        &self,
        target: &str,
    ) -> Result<HashMap<String, BuildOutput>, Error> {
        let successors: Vec<String> = self
            .graph
            .successors(&target.to_owned())?
            .into_iter()
            .cloned()
            .collect();

        let mut input = HashMap::new();

        for dep in successors {
            let output = match self.fetch_build_output(&dep) {
                Ok(output) => output,
                Err(ref err) if err.is_build_not_found() => BuildOutput::new(),
                Err(err) => return Err(err),
            };

            input.insert(dep, output);
        }

        Ok(input)
    }

    fn fetch_build_output(&self, target: &str) -> Result<BuildOutput, Error> {
        let factory = self.deployables.get(target).ok_or_else(|| {
            Error::config(format!(
                "no deployable registered for target '{}'",
                target
            ))
        })?;

        let ctx = Context::new(
            self.project.clone(),
            self.env.clone(),
            HashMap::new(),
            self.workspace.build_dir(target),
            self.workspace.build_output_dir(target),
            self.workspace.destroy_dir(target),
        );

        factory(ctx).get_build_output()
    }
}
