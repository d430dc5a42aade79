//! ASCII layout files describing a smoke board.
//!
//! Each line is one row of the board and each byte one cell:
//!
//! ```text
//! /  wall
//! 0-9 floor of the given height
//! :  escape opening
//! ```
//!
//! The engine trusts its input buffer, so hosts load layouts through
//! [`Layout`], which enforces the shape and alphabet before handing the codes on.

use std::fs;
use std::path::Path;

use crate::compute::{Engine, EngineError};

/// Lowest valid layout byte (wall).
pub const WALL_CODE: u8 = b'/';

/// Highest valid layout byte (escape).
pub const ESCAPE_CODE: u8 = b':';

/// Maximum number of rows or columns a layout may have.
pub const MAX_LAYOUT_SIDE: usize = 512;

/// Layout loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("An I/O error occurred while opening the file for reading: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid character '{ch}' ({code}) detected at {row}, {col}")]
    InvalidCharacter {
        ch: char,
        code: u32,
        row: usize,
        col: usize,
    },
    #[error("Each row must have the same number of columns (row {row} has {found}, expected {expected})")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("The layout must not be empty")]
    Empty,
    #[error("The layout must not exceed a size of 512x512 cells ({rows}x{cols})")]
    TooLarge { rows: usize, cols: usize },
}

/// A validated, rectangular board layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Number of rows (board height).
    pub rows: usize,
    /// Number of columns (board width).
    pub cols: usize,
    data: Vec<u8>,
}

impl Layout {
    /// Read and validate a layout file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Validate layout text.
    ///
    /// Rows are reported 1-based and columns 0-based in errors.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut data = Vec::with_capacity(text.len());
        let mut rows = 0usize;
        let mut cols = 0usize;

        for (i, line) in text.lines().enumerate() {
            let row = i + 1;
            for (col, ch) in line.char_indices() {
                if !is_layout_code(ch) {
                    return Err(LayoutError::InvalidCharacter {
                        ch,
                        code: ch as u32,
                        row,
                        col,
                    });
                }
            }
            if row > 1 && line.len() != cols {
                return Err(LayoutError::RaggedRows {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            cols = line.len();
            rows = row;
            data.extend_from_slice(line.as_bytes());
        }

        if rows == 0 || cols == 0 {
            return Err(LayoutError::Empty);
        }
        if rows > MAX_LAYOUT_SIDE || cols > MAX_LAYOUT_SIDE {
            return Err(LayoutError::TooLarge { rows, cols });
        }

        Ok(Self { rows, cols, data })
    }

    /// Row-major cell codes, `rows * cols` bytes long.
    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.data
    }

    /// Build an engine over this layout with the emitter at `(row, col)`.
    pub fn engine(&self, emitter_row: usize, emitter_col: usize) -> Result<Engine, EngineError> {
        Engine::new(self.cols, self.rows, &self.data, emitter_row, emitter_col)
    }
}

fn is_layout_code(ch: char) -> bool {
    ch.is_ascii() && (WALL_CODE..=ESCAPE_CODE).contains(&(ch as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_rectangular() {
        let layout = Layout::parse("///\n/0:\n///\n").unwrap();
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.cols, 3);
        assert_eq!(layout.codes(), b"////0:///");
    }

    #[test]
    fn test_invalid_character_position() {
        let err = Layout::parse("000\n0x0\n").unwrap_err();
        match err {
            LayoutError::InvalidCharacter { ch, code, row, col } => {
                assert_eq!(ch, 'x');
                assert_eq!(code, u32::from(b'x'));
                assert_eq!(row, 2);
                assert_eq!(col, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_rows() {
        let err = Layout::parse("000\n00\n").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::RaggedRows {
                row: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty() {
        assert!(matches!(Layout::parse(""), Err(LayoutError::Empty)));
        assert!(matches!(Layout::parse("\n"), Err(LayoutError::Empty)));
    }

    #[test]
    fn test_too_large() {
        let wide = "0".repeat(MAX_LAYOUT_SIDE + 1);
        assert!(matches!(
            Layout::parse(&wide),
            Err(LayoutError::TooLarge { rows: 1, cols: 513 })
        ));

        let max = "0".repeat(MAX_LAYOUT_SIDE);
        assert!(Layout::parse(&max).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.txt");
        fs::write(&path, "/////\n/000:\n/////\n").unwrap();

        let layout = Layout::load(&path).unwrap();
        assert_eq!((layout.rows, layout.cols), (3, 5));

        let engine = layout.engine(1, 1).unwrap();
        assert_eq!(engine.grid().width(), 5);
        assert_eq!(engine.grid().height(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Layout::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}
