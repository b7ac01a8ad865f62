// Copyright (c) 2017 Jason White
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

use crate::context::Context;
use crate::error::Error;
use crate::output::BuildOutput;

/// The interface a deployable target must satisfy.
///
/// A unit is anything that can build itself, publish a build output record,
/// judge its own freshness, and tear itself down. Most deployables in
/// practice are cloud resource stacks, packaged code archives, or
/// post-deploy invocations -- but the engine knows nothing about any of
/// those; it only ever talks to this trait.
///
/// Units never call back into the engine. All coordination with the engine
/// flows through the [`Context`] the unit was constructed with.
pub trait Unit {
    /// Builds the target. The current working directory during the call is
    /// the build dir; the unit may write anywhere under the build dir or
    /// the build-output dir. Any error aborts the current run.
    fn build(&mut self) -> Result<(), Error>;

    /// Returns the build output record of the most recent successful
    /// build.
    ///
    /// Must be safe to call after a successful `build`, after a skipped
    /// `build` (a freshness hit), and during a destroy (to supply inputs to
    /// predecessors). Returns [`Error::BuildNotFound`] if the target has
    /// never been built, or its previous output has since been cleared.
    fn get_build_output(&self) -> Result<BuildOutput, Error>;

    /// Returns `true` when the engine must run `build`; `false` permits a
    /// skip. Defaults to always building.
    ///
    /// Units that implement freshness typically hash all build-relevant
    /// inputs (configuration, template bytes, a source tree digest,
    /// dependency outputs) and compare against a witness stored in the
    /// build-output dir.
    fn is_build_outdated(&self) -> Result<bool, Error> {
        Ok(true)
    }

    /// Releases whatever external resources this target owns. The current
    /// working directory during the call is the destroy dir. Defaults to a
    /// no-op.
    fn destroy(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Constructs a fresh [`Unit`] for a target, given the [`Context`] the
/// engine prepared for it.
///
/// A project's deployable registry maps each target name to one of these.
/// The engine calls it at most twice per target per invocation: once to
/// build (or skip) it, and, for a destroy run that visits the target,
/// again to destroy it -- always with a freshly constructed instance, never
/// a reused one.
pub type UnitFactory = Box<dyn Fn(Context) -> Box<dyn Unit> + Send + Sync>;
