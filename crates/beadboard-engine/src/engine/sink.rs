use std::{
    convert::Infallible,
    io::{self, Write},
};

use crate::core::Inventory;

use super::solution::Solution;

/// Receives each solution exactly once, in the order the search finds them.
///
/// An error stops the search and is returned from it unchanged.
pub trait SolutionSink {
    type Error;

    fn accept(&mut self, solution: &Solution) -> Result<(), Self::Error>;
}

impl SolutionSink for Vec<Solution> {
    type Error = Infallible;

    fn accept(&mut self, solution: &Solution) -> Result<(), Self::Error> {
        self.push(solution.clone());
        Ok(())
    }
}

/// Counts solutions and drops them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolutionCounter {
    pub count: u64,
}

impl SolutionSink for SolutionCounter {
    type Error = Infallible;

    fn accept(&mut self, _solution: &Solution) -> Result<(), Self::Error> {
        self.count += 1;
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SinkError {
    #[display("failed to encode solution: {_0}")]
    Encode(serde_json::Error),
    #[display("failed to write solution: {_0}")]
    Io(io::Error),
}

/// Appends one JSON line per solution to a writer.
///
/// Each line is a [`SolutionRecord`](super::solution::SolutionRecord). The
/// writer is flushed after every solution so that a record is never lost to
/// an interrupted run.
#[derive(Debug)]
pub struct JsonLinesSink<'a, W> {
    writer: W,
    inventory: &'a Inventory,
    written: u64,
}

impl<'a, W> JsonLinesSink<'a, W>
where
    W: Write,
{
    pub fn new(writer: W, inventory: &'a Inventory) -> Self {
        Self {
            writer,
            inventory,
            written: 0,
        }
    }

    /// Number of solutions written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> SolutionSink for JsonLinesSink<'_, W>
where
    W: Write,
{
    type Error = SinkError;

    fn accept(&mut self, solution: &Solution) -> Result<(), Self::Error> {
        let record = solution.to_record(self.inventory);
        serde_json::to_writer(&mut self.writer, &record).map_err(SinkError::Encode)?;
        self.writer.write_all(b"\n").map_err(SinkError::Io)?;
        self.writer.flush().map_err(SinkError::Io)?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BoardDims, Piece, PlacementRecord, Puzzle, PuzzleConfig, Rotation, SolutionRecord, Variant,
    };

    fn square_solution() -> (Puzzle, Solution) {
        let dims = BoardDims::new(2, 2).unwrap();
        let inventory = Inventory::new(vec![Piece::parse("square", "xxxx").unwrap()]).unwrap();
        let puzzle = Puzzle::new(PuzzleConfig::new(dims, inventory));
        let record = SolutionRecord(vec![PlacementRecord(
            "square".to_owned(),
            Variant::A,
            Rotation::N,
            0,
            0,
        )]);
        let solution = record.resolve(&puzzle).unwrap();
        (puzzle, solution)
    }

    #[test]
    fn test_json_lines_sink() {
        let (puzzle, solution) = square_solution();
        let mut sink = JsonLinesSink::new(vec![], puzzle.config().inventory());
        sink.accept(&solution).unwrap();
        sink.accept(&solution).unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, [r#"[["square","A","N",0,0]]"#; 2]);
        for line in lines {
            let record: SolutionRecord = serde_json::from_str(line).unwrap();
            assert_eq!(record.resolve(&puzzle).unwrap(), solution);
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines_sink_propagates_write_errors() {
        let (puzzle, solution) = square_solution();
        let mut sink = JsonLinesSink::new(FailingWriter, puzzle.config().inventory());
        assert!(sink.accept(&solution).is_err());
        assert_eq!(sink.written(), 0);
    }

    #[test]
    fn test_counter_and_vec_sinks() {
        let (_, solution) = square_solution();
        let mut counter = SolutionCounter::default();
        let mut solutions = vec![];
        for _ in 0..3 {
            counter.accept(&solution).unwrap();
            solutions.accept(&solution).unwrap();
        }
        assert_eq!(counter.count, 3);
        assert_eq!(solutions.len(), 3);
    }
}
