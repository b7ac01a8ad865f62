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
use std::fmt;
use std::io;

/// Error raised when one or more edges name a target that was never
/// declared as a node.
#[derive(Debug)]
pub struct UnknownTargetError {
    pub target: String,
    pub known: Vec<String>,
}

impl std::error::Error for UnknownTargetError {}

impl fmt::Display for UnknownTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown target '{}' (known targets: {})",
            self.target,
            if self.known.is_empty() {
                "none".to_owned()
            } else {
                self.known.join(", ")
            }
        )
    }
}

/// Error raised when the declared edges contain one or more cycles.
///
/// Only the first cycle found is reported, named as a concrete path through
/// the graph, e.g. `a -> b -> a`.
#[derive(Debug)]
pub struct CircularDependencyError {
    pub cycle: Vec<String>,
}

impl std::error::Error for CircularDependencyError {}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency found: ")?;

        for (i, node) in self.cycle.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", node)?;
        }

        Ok(())
    }
}

/// The main error enum. All other errors trickle down into this one.
#[derive(Debug)]
pub enum Error {
    /// A malformed project configuration or a failed environment
    /// validation.
    Config(String),

    /// A cycle was found in the declared dependency edges.
    CircularDependency(CircularDependencyError),

    /// An edge endpoint or query target is not a known node in the graph.
    UnknownTarget(UnknownTargetError),

    /// A previously built output is unavailable.
    BuildNotFound { target: String },

    /// An error surfaced by user unit code.
    UnitFailure(failure::Error),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Error {
        Error::Config(msg.into())
    }

    pub fn build_not_found<S: Into<String>>(target: S) -> Error {
        Error::BuildNotFound {
            target: target.into(),
        }
    }

    /// `true` for the one recoverable case the destroyer is permitted to
    /// swallow: a missing prior build while gathering successor outputs.
    pub fn is_build_not_found(&self) -> bool {
        matches!(self, Error::BuildNotFound { .. })
    }
}

impl From<CircularDependencyError> for Error {
    fn from(err: CircularDependencyError) -> Error {
        Error::CircularDependency(err)
    }
}

impl From<UnknownTargetError> for Error {
    fn from(err: UnknownTargetError) -> Error {
        Error::UnknownTarget(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::UnitFailure(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::UnitFailure(err.into())
    }
}

impl From<failure::Error> for Error {
    fn from(err: failure::Error) -> Error {
        Error::UnitFailure(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "ConfigError: {}", msg),
            Error::CircularDependency(err) => write!(f, "{}", err),
            Error::UnknownTarget(err) => write!(f, "{}", err),
            Error::BuildNotFound { target } => {
                write!(f, "no build output found for target '{}'", target)
            }
            Error::UnitFailure(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CircularDependency(err) => Some(err),
            Error::UnknownTarget(err) => Some(err),
            _ => None,
        }
    }
}
