//! Line filtering for the `sieve` command.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use sieve::{AnyOf, Predicate, Selector};
use tracing::{debug, warn};

use crate::error::CliError;

/// How lines are selected and reported.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Expression and aliases applied to each line.
    pub selector: Selector,
    /// Select the lines that do *not* match.
    pub invert: bool,
    /// Split each line on this separator and match the parts as a
    /// collection.
    pub split: Option<String>,
    /// Report the number of selected lines instead of the lines.
    pub count: bool,
}

/// A compiled line filter.
#[derive(Debug)]
pub struct LineFilter {
    predicate: Predicate,
    invert: bool,
    split: Option<String>,
    count: bool,
}

impl LineFilter {
    /// Compile the options.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Expression` when the expression does not compile.
    pub fn new(options: FilterOptions) -> Result<Self, CliError> {
        let predicate = options
            .selector
            .predicate()?
            .unwrap_or_else(|| Predicate::constant(true));
        Ok(Self {
            predicate,
            invert: options.invert,
            split: options.split,
            count: options.count,
        })
    }

    /// `true` when `line` should be written.
    #[must_use]
    pub fn selects(&self, line: &str) -> bool {
        let matched = self.split.as_deref().map_or_else(
            || self.predicate.matches(line),
            |separator| self.predicate.matches(&AnyOf(line.split(separator))),
        );
        matched != self.invert
    }

    /// Filter one input, writing selected lines to `out` unless counting.
    /// Returns the number of selected lines.
    ///
    /// Lines that are not valid UTF-8 are matched with each bad sequence
    /// replaced by U+FFFD and written back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Input` when reading fails, tagged with `path`, or
    /// `CliError::Io` when writing fails.
    pub fn filter_input<R: BufRead, W: Write>(
        &self,
        input: R,
        path: &Path,
        out: &mut W,
    ) -> Result<usize, CliError> {
        let mut selected = 0;
        self.filter_into(input, path, out, &mut selected)?;
        Ok(selected)
    }

    fn filter_into<R: BufRead, W: Write>(
        &self,
        mut input: R,
        path: &Path,
        out: &mut W,
        selected: &mut usize,
    ) -> Result<(), CliError> {
        let mut buf = Vec::new();
        let mut lossy = 0_usize;
        let mut from_input = 0_usize;
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(|source| CliError::Input {
                    path: path.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            let line = strip_line_ending(&buf);
            let text = String::from_utf8_lossy(line);
            if matches!(text, Cow::Owned(_)) {
                lossy += 1;
            }
            if !self.selects(&text) {
                continue;
            }
            *selected += 1;
            from_input += 1;
            if !self.count {
                out.write_all(line)?;
                out.write_all(b"\n")?;
            }
        }
        if lossy > 0 {
            warn!(path = %path.display(), lines = lossy, "matched lines that are not valid UTF-8");
        }
        debug!(path = %path.display(), selected = from_input, "filtered input");
        Ok(())
    }

    /// Filter every file in `paths` in order, or standard input when `paths`
    /// is empty or names `-`. Returns the total number of selected lines.
    ///
    /// When `out` is closed early (a broken pipe) filtering stops and the
    /// lines selected so far are counted as the result.
    ///
    /// # Errors
    ///
    /// Returns the first other failure; lines already written stay written.
    pub fn run<W: Write>(&self, paths: &[PathBuf], out: &mut W) -> Result<usize, CliError> {
        let mut selected = 0;
        match self.run_into(paths, out, &mut selected) {
            Err(CliError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!(selected, "output closed early");
                Ok(selected)
            }
            result => result.map(|()| selected),
        }
    }

    fn run_into<W: Write>(
        &self,
        paths: &[PathBuf],
        out: &mut W,
        selected: &mut usize,
    ) -> Result<(), CliError> {
        let stdin = [PathBuf::from("-")];
        let paths = if paths.is_empty() { stdin.as_slice() } else { paths };

        for path in paths {
            if path.as_os_str() == "-" {
                self.filter_into(io::stdin().lock(), path, out, selected)?;
            } else {
                let file = File::open(path).map_err(|source| CliError::Input {
                    path: path.clone(),
                    source,
                })?;
                self.filter_into(BufReader::new(file), path, out, selected)?;
            }
        }
        if self.count {
            writeln!(out, "{selected}")?;
        }
        out.flush()?;
        Ok(())
    }
}

// Strips `\n` or `\r\n`, as `BufRead::lines` does.
fn strip_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n")
        .map_or(line, |line| line.strip_suffix(b"\r").unwrap_or(line))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests filter in-memory input")]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line_filter(expression: &str, invert: bool, split: Option<&str>, count: bool) -> LineFilter {
        LineFilter::new(FilterOptions {
            selector: Selector::new(expression),
            invert,
            split: split.map(str::to_owned),
            count,
        })
        .unwrap()
    }

    fn filter_text(filter: &LineFilter, input: &str) -> (usize, String) {
        let mut out = Vec::new();
        let selected = filter
            .filter_input(input.as_bytes(), Path::new("-"), &mut out)
            .unwrap();
        (selected, String::from_utf8(out).unwrap())
    }

    #[rstest]
    #[case("A", false, None, "A\n")]
    #[case("A", true, None, "B\nA,B\n")]
    #[case("A&B", false, Some(","), "A,B\n")]
    #[case("A", false, Some(","), "A\nA,B\n")]
    #[case("*", false, None, "A\nB\nA,B\n")]
    #[case("B", false, None, "B\n")]
    fn selects_lines(
        #[case] expression: &str,
        #[case] invert: bool,
        #[case] split: Option<&str>,
        #[case] expected: &str,
    ) {
        let filter = line_filter(expression, invert, split, false);
        let (selected, out) = filter_text(&filter, "A\nB\r\nA,B\n");
        assert_eq!(out, expected);
        assert_eq!(selected, expected.lines().count());
    }

    #[test]
    fn counting_suppresses_lines() {
        let filter = line_filter("!B", false, None, true);
        assert_eq!(filter_text(&filter, "A\nB\nC"), (2, String::new()));
    }

    #[test]
    fn invalid_utf8_lines_are_matched_lossily_and_written_unchanged() {
        let filter = line_filter("*A|B", false, None, false);
        let mut out = Vec::new();
        let selected = filter
            .filter_input(&b"A\n\xffA\nC\xfe\nB\r\n"[..], Path::new("-"), &mut out)
            .unwrap();
        assert_eq!(selected, 3);
        assert_eq!(out, b"A\n\xffA\nB\n");
    }

    #[test]
    fn replacement_character_is_matchable() {
        let filter = line_filter("\u{FFFD}", false, None, true);
        let mut out = Vec::new();
        let selected = filter
            .filter_input(&b"\xff\nA\n"[..], Path::new("-"), &mut out)
            .unwrap();
        assert_eq!(selected, 1);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[rstest]
    #[case("A", false, 1)]
    #[case("Z", false, 0)]
    #[case("A", true, 2)]
    fn closed_output_reports_lines_selected_so_far(
        #[case] expression: &str,
        #[case] count: bool,
        #[case] expected: usize,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "A\nB\nA\n").unwrap();

        let filter = line_filter(expression, false, None, count);
        assert_eq!(filter.run(&[input], &mut ClosedPipe).unwrap(), expected);
    }

    #[test]
    fn other_write_errors_are_reported() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::StorageFull))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "A\n").unwrap();
        let filter = line_filter("A", false, None, false);
        assert!(matches!(filter.run(&[input], &mut Full), Err(CliError::Io(_))));
    }

    #[test]
    fn selector_without_expression_selects_everything() {
        let filter = LineFilter::new(FilterOptions::default()).unwrap();
        assert!(filter.selects(""));
        assert!(filter.selects("anything"));
    }

    #[test]
    fn run_reports_missing_files() {
        let filter = line_filter("A", false, None, false);
        let result = filter.run(&[PathBuf::from("/nonexistent/sieve-input")], &mut Vec::new());
        assert!(matches!(result, Err(CliError::Input { .. })));
    }

    #[test]
    fn run_appends_total_when_counting() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "A\nB\n").unwrap();
        std::fs::write(&second, "A\n").unwrap();

        let filter = line_filter("A", false, None, true);
        let mut out = Vec::new();
        assert_eq!(filter.run(&[first, second], &mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "2\n");
    }
}
