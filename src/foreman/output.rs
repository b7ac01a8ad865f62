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

use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::Error;

/// A build output record.
///
/// This is opaque to the engine: it is propagated by value, keyed by the
/// producing target's name, into a dependent's [`Context`](crate::Context).
/// The engine neither requires nor interprets any particular shape here; a
/// flat key-to-scalar map is merely the recommended convention, which is why
/// `serde_json`'s own map type is reused rather than inventing a parallel
/// one.
pub type BuildOutput = Map<String, Value>;

/// Reads a build output record previously written with [`write`].
///
/// Returns [`Error::BuildNotFound`] if the file does not exist, which is
/// the outcome a `Unit::get_build_output` implementation is expected to
/// surface when it has never built (or its prior output has been cleared).
pub fn read<P: AsRef<Path>>(path: P, target: &str) -> Result<BuildOutput, Error> {
    let path = path.as_ref();

    let f = match fs::File::open(path) {
        Ok(f) => f,
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::build_not_found(target));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(serde_json::from_reader(BufReader::new(f))?)
}

/// Writes a build output record to `path`, replacing any previous contents
/// atomically.
///
/// Grounded on `BuildState::write_to_path`'s use of `tempfile::NamedTempFile`
/// to avoid ever leaving a half-written witness file behind if the process
/// is interrupted mid-write.
pub fn write<P: AsRef<Path>>(
    path: P,
    output: &BuildOutput,
) -> Result<(), Error> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tempfile = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(BufWriter::new(&mut tempfile), output)?;
    tempfile
        .persist(path)
        .map_err(|err| Error::UnitFailure(err.error.into()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips_the_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.json");

        let output = json!({ "name": "a", "arn": "arn:aws:s3:::a" })
            .as_object()
            .unwrap()
            .clone();

        write(&path, &output).unwrap();
        let read_back = read(&path, "a").unwrap();

        assert_eq!(read_back, output);
    }

    #[test]
    fn read_reports_build_not_found_for_a_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-output.json");

        let err = read(&path, "a").unwrap_err();
        assert!(err.is_build_not_found());
    }

    #[test]
    fn write_replaces_existing_contents_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.json");

        let first = json!({ "name": "a" }).as_object().unwrap().clone();
        write(&path, &first).unwrap();

        let second = json!({ "name": "a", "revision": 2 })
            .as_object()
            .unwrap()
            .clone();
        write(&path, &second).unwrap();

        assert_eq!(read(&path, "a").unwrap(), second);
    }
}
