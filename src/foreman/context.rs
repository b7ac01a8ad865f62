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

use crate::output::BuildOutput;
use crate::project::Project;

/// A validated mapping of configuration keys to string values. The engine
/// treats this as opaque aside from deep-copying it into each [`Context`];
/// the schema is entirely project-defined.
pub type Env = HashMap<String, String>;

/// The immutable, per-invocation value handed to a unit when it is
/// constructed.
///
/// This is the only channel from the engine to a unit: a unit never calls
/// back into the builder, destroyer, or graph directly.
#[derive(Clone)]
pub struct Context {
    project: Arc<dyn Project>,
    env: Env,
    input: HashMap<String, BuildOutput>,
    build_dir: PathBuf,
    build_output_dir: PathBuf,
    destroy_dir: PathBuf,
}

impl Context {
    pub(crate) fn new(
        project: Arc<dyn Project>,
        env: Env,
        input: HashMap<String, BuildOutput>,
        build_dir: PathBuf,
        build_output_dir: PathBuf,
        destroy_dir: PathBuf,
    ) -> Context {
        Context {
            project,
            env,
            input,
            build_dir,
            build_output_dir,
            destroy_dir,
        }
    }

    /// A handle back to the owning project, for the rare unit that needs
    /// project-level knowledge.
    pub fn project(&self) -> &Arc<dyn Project> {
        &self.project
    }

    /// The validated environment, deep-copied so that a unit's mutations
    /// never leak to its peers.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// The build outputs of this target's direct successors (dependencies),
    /// keyed by target name.
    pub fn input(&self) -> &HashMap<String, BuildOutput> {
        &self.input
    }

    /// The transient build dir. The current working directory during a
    /// `build()` call is this path.
    pub fn build_dir(&self) -> &PathBuf {
        &self.build_dir
    }

    /// The persistent build-output dir, where a unit is expected to stash
    /// its freshness witness and its published output record.
    pub fn build_output_dir(&self) -> &PathBuf {
        &self.build_output_dir
    }

    /// The transient destroy dir. The current working directory during a
    /// `destroy()` call is this path.
    pub fn destroy_dir(&self) -> &PathBuf {
        &self.destroy_dir
    }
}
