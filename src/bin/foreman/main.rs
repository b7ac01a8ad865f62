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

mod opts;

use std::io::Write;
use std::process::exit;

use structopt::StructOpt;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use foreman::loader::ConfigRegistry;
use foreman::project::Project;

use crate::opts::{Command, Opts};

fn main() {
    pretty_env_logger::init();

    let opts = Opts::from_args();
    exit(run(&opts));
}

/// Runs the requested command, returning the process exit code: `0` on
/// success, `1` if the project failed to load or the command itself
/// failed.
fn run(opts: &Opts) -> i32 {
    // A real deployment registers its project into the registry ahead of
    // calling this binary's logic; see `foreman::loader`. This binary's own
    // registry is always empty, so an unconfigured project directory
    // reliably produces the same `ConfigError` a real loader would raise
    // for a missing entry point.
    let registry = ConfigRegistry::new();
    let config_path = opts.project_dir.join(&opts.config);

    let project = match registry.load_config(&config_path) {
        Ok(project) => project,
        Err(err) => {
            print_error(&err);
            return 1;
        }
    };

    let target = match &opts.command {
        Command::Build { target } | Command::Destroy { target } => {
            target.as_deref()
        }
    };

    let result = match &opts.command {
        Command::Build { .. } => project.build(target).map(|_| ()),
        Command::Destroy { .. } => project.destroy(target),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            1
        }
    }
}

fn print_error(err: &foreman::Error) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);

    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {}", err);
}
