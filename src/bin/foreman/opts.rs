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

use std::path::PathBuf;

use structopt::StructOpt;

/// A dependency-graph build/destroy orchestrator.
#[derive(StructOpt, Debug)]
#[structopt(name = "foreman")]
pub struct Opts {
    /// The project directory. Defaults to the current directory.
    #[structopt(long = "project-dir", parse(from_os_str), default_value = ".")]
    pub project_dir: PathBuf,

    /// The project's config file name, relative to `project-dir`.
    #[structopt(
        long = "config",
        parse(from_os_str),
        default_value = "foreman.rs"
    )]
    pub config: PathBuf,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Builds a target and everything it transitively depends on.
    Build {
        /// The target to build. Defaults to the project's default build
        /// target.
        target: Option<String>,
    },

    /// Destroys a target (and everything that depends on it), or, if no
    /// target is given, every target in the project.
    Destroy {
        /// The target to destroy.
        target: Option<String>,
    },
}
