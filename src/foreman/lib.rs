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

mod builder;
pub mod context;
mod destroyer;
pub mod error;
pub mod graph;
pub mod loader;
pub mod output;
pub mod project;
pub mod unit;
pub mod workspace;

pub use crate::builder::Builder;
pub use crate::context::Context;
pub use crate::destroyer::Destroyer;
pub use crate::error::Error;
pub use crate::graph::Graph;
pub use crate::loader::ConfigRegistry;
pub use crate::output::BuildOutput;
pub use crate::project::Project;
pub use crate::unit::{Unit, UnitFactory};
pub use crate::workspace::Workspace;
