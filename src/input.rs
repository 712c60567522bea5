//! Line-oriented text input for fractions and matrices.

use crate::error::{Error, Result};
use crate::matrix::matrix_q::MatrixQ;
use crate::rings::fraction::Fraction;
use log::trace;
use std::io::{BufRead, Write};

/// Prompts with `Input value:` until a line parses as a fraction
/// (`[-]N` or `[-]N/D`, whitespace ignored). Lines that do not parse, or
/// that have a zero denominator, print `Invalid input` and are asked again.
pub fn read_fraction<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<Fraction> {
    let mut line = String::new();
    loop {
        write!(writer, "Input value:")?;
        writer.flush()?;

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(Error::Io("unexpected end of input".to_string()));
        }

        match line.parse::<Fraction>() {
            Ok(value) => return Ok(value),
            Err(err) => {
                trace!("rejected input {:?}: {}", line.trim_end(), err);
                writeln!(writer, "Invalid input")?;
            }
        }
    }
}

pub fn read_matrix<R: BufRead, W: Write>(
    rows: usize,
    cols: usize,
    reader: &mut R,
    writer: &mut W,
) -> Result<MatrixQ> {
    let mut matrix = MatrixQ::new(rows, cols)?;
    for row in 1..=rows {
        for col in 1..=cols {
            writeln!(writer, "Value to be input in position ({}, {})", row, col)?;
            let value = read_fraction(reader, writer)?;
            matrix.store_value(value, row, col)?;
        }
    }
    Ok(matrix)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
