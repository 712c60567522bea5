use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::matrix::elimination::Reduction;
use crate::matrix::matrix::Matrix;
use crate::matrix::matrix_q::MatrixQ;
use crate::rings::fraction::Fraction;
use log::debug;
use num_traits::{One, Zero};

/// A free unknown of a linear system and the direction it contributes to
/// the solution set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeVariable {
    /// 0-indexed column of the unknown.
    pub index: usize,
    /// One entry per unknown: `1` at `index`, the negated RREF coefficient
    /// for every basic unknown, `0` for the other free ones.
    pub direction: Vec<Fraction>,
}

/// Solution set of an augmented system `[A | b]`.
///
/// A family is parametrised as `x = constants + Σ t_i · free[i].direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    NoSolution,
    Unique(Vec<Fraction>),
    Family {
        free: Vec<FreeVariable>,
        constants: Vec<Fraction>,
    },
}

impl Solution {
    fn from_reduced(rref: &MatrixQ) -> Solution {
        let unknowns = rref.cols - 1;
        let mut pivots = Vec::new();
        let mut free_columns = Vec::new();

        let mut row = 0;
        for col in 0..unknowns {
            if row < rref.rows && !rref.at(row, col).is_zero() {
                pivots.push((col, row));
                row += 1;
            } else {
                free_columns.push(col);
            }
        }

        let mut constants = vec![Fraction::zero(); unknowns];
        for &(col, row) in &pivots {
            constants[col] = rref.at(row, unknowns).clone();
        }

        if free_columns.is_empty() {
            return Solution::Unique(constants);
        }

        let free = free_columns
            .into_iter()
            .map(|index| {
                let mut direction = vec![Fraction::zero(); unknowns];
                direction[index] = Fraction::one();
                for &(col, row) in &pivots {
                    direction[col] = -rref.at(row, index);
                }
                FreeVariable { index, direction }
            })
            .collect();

        Solution::Family { free, constants }
    }

    pub fn is_consistent(&self) -> bool {
        !matches!(self, Solution::NoSolution)
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, Solution::Unique(_))
    }

    /// Particular solution, `None` when the system is inconsistent.
    pub fn constants(&self) -> Option<&[Fraction]> {
        match self {
            Solution::NoSolution => None,
            Solution::Unique(constants) | Solution::Family { constants, .. } => Some(constants),
        }
    }

    pub fn free_variables(&self) -> &[FreeVariable] {
        match self {
            Solution::Family { free, .. } => free,
            _ => &[],
        }
    }

    /// Point of the solution set obtained by giving the free unknowns the
    /// values `params`, in the order of [`Solution::free_variables`].
    pub fn evaluate(&self, params: &[Fraction]) -> Result<Vec<Fraction>> {
        let constants = match self.constants() {
            Some(constants) => constants,
            None => return Err(Error::InvalidValue("system has no solution".to_string())),
        };

        let free = self.free_variables();
        if params.len() != free.len() {
            return Err(Error::InvalidValue(format!(
                "expected {} free variable value(s), got {}",
                free.len(),
                params.len()
            )));
        }

        let mut point = constants.to_vec();
        for (variable, t) in free.iter().zip(params) {
            for (x, d) in point.iter_mut().zip(&variable.direction) {
                *x += t * d;
            }
        }
        Ok(point)
    }
}

impl MatrixQ {
    /// Solution set of the receiver read as an augmented system, the last
    /// column holding the constants. Computed once and cached.
    pub fn find_solution(&self) -> &Solution {
        self.derived.solution.get_or_init(|| {
            let solution = match self.reduce_system() {
                Reduction::Reduced(rref) => Solution::from_reduced(&rref),
                _ => Solution::NoSolution,
            };
            debug!(
                "{}x{} system: consistent={}, free variables={}",
                self.rows,
                self.cols,
                solution.is_consistent(),
                solution.free_variables().len()
            );
            solution
        })
    }

    pub fn output_solution(&self) -> Option<String> {
        self.output_solution_with(&DisplayConfig::default())
    }

    /// Renders the solution as a column-vector equation, here for
    /// `x1 + 2 x2 = 3` with a cell width of 4:
    ///
    /// ```text
    /// [ x1   = x2 [ -2   + [ 3
    ///   x2 ]        1  ]     0  ]
    /// ```
    ///
    /// Returns `None` when the system has no solution.
    pub fn output_solution_with(&self, config: &DisplayConfig) -> Option<String> {
        let solution = self.find_solution();
        let constants = solution.constants()?;
        let free = solution.free_variables();
        let width = config.cell_width;
        let last = constants.len().saturating_sub(1);

        let mut out = String::new();
        for (i, constant) in constants.iter().enumerate() {
            let open = if i == 0 { '[' } else { ' ' };
            let close = if i == last { ']' } else { ' ' };
            let (eq, plus) = if i == 0 { ('=', '+') } else { (' ', ' ') };

            let mut line = format!(
                "{}{:^width$}{} {} ",
                open,
                config.variable(i),
                close,
                eq,
                width = width
            );
            for variable in free {
                let name = config.variable(variable.index);
                let label = if i == 0 {
                    name
                } else {
                    " ".repeat(name.len())
                };
                line += &format!(
                    "{} {}{:^width$}{} {} ",
                    label,
                    open,
                    variable.direction[i],
                    close,
                    plus,
                    width = width
                );
            }
            line += &format!("{}{:^width$}{}", open, constant, close, width = width);

            out += line.trim_end();
            out.push('\n');
        }
        Some(out)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
