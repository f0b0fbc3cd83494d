//! Nice efp-gamess output formatting.

use std::fmt;

use log;
use ndarray::{ArrayBase, Data, Ix2};

const EFPG_BANNER_LENGTH: usize = 103;

/// Number of matrix columns printed per block.
const MATRIX_BLOCK_COLS: usize = 6;

/// Logs an error to the `efp-gamess-output` logger.
macro_rules! efpg_error {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        log::error!($fmt, $($($arg)*)?);
        log::error!(target: "efp-gamess-output", $fmt, $($($arg)*)?);
    }
}

/// Logs a warning to the `efp-gamess-output` logger.
macro_rules! efpg_warn {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::warn!(target: "efp-gamess-output", $fmt, $($($arg)*)?); }
}

/// Logs a main output line to the `efp-gamess-output` logger.
macro_rules! efpg_output {
    ($fmt:expr $(, $($arg:tt)*)?) => { log::info!(target: "efp-gamess-output", $fmt, $($($arg)*)?); }
}

pub(crate) use {efpg_error, efpg_output, efpg_warn};

/// Logs a nicely formatted section title to the `efp-gamess-output` logger.
pub(crate) fn log_title(title: &str) {
    let length = title.chars().count().max(EFPG_BANNER_LENGTH - 6);
    let bar = "─".repeat(length);
    efpg_output!("┌──{bar}──┐");
    efpg_output!("│§ {title:^length$} §│");
    efpg_output!("└──{bar}──┘");
}

/// Logs a nicely formatted subtitle to the `efp-gamess-output` logger.
pub(crate) fn log_subtitle(subtitle: &str) {
    let length = subtitle.chars().count();
    let bar = "═".repeat(length);
    efpg_output!("{}", subtitle);
    efpg_output!("{}", bar);
}

/// Logs a nicely formatted macro-section beginning to the `efp-gamess-output` logger.
pub(crate) fn log_macsec_begin(sectitle: &str) {
    let width = EFPG_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    efpg_output!("❬❬❬❬❬ [Begin] {sectitle_space:❬<width$}");
}

/// Logs a nicely formatted macro-section ending to the `efp-gamess-output` logger.
pub(crate) fn log_macsec_end(sectitle: &str) {
    let width = EFPG_BANNER_LENGTH - 14;
    let sectitle_space = sectitle.to_string() + " ";
    efpg_output!("❭❭❭❭❭ [ End ] {sectitle_space:❭<width$}");
}

/// Turns a boolean into a string of `yes` or `no`.
pub(crate) fn nice_bool(b: bool) -> String {
    if b {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

/// Writes a matrix in blocks of columns, with 1-based row and column labels.
pub(crate) fn write_matrix<S>(
    f: &mut fmt::Formatter<'_>,
    mat: &ArrayBase<S, Ix2>,
) -> fmt::Result
where
    S: Data<Elem = f64>,
{
    for col_start in (0..mat.ncols()).step_by(MATRIX_BLOCK_COLS) {
        let col_end = (col_start + MATRIX_BLOCK_COLS).min(mat.ncols());
        write!(f, "{:>6}", "")?;
        for j in col_start..col_end {
            write!(f, "{:>14}", j + 1)?;
        }
        writeln!(f)?;
        for (i, row) in mat.rows().into_iter().enumerate() {
            write!(f, "{:>6}", i + 1)?;
            for j in col_start..col_end {
                write!(f, "{:>14.8}", row[j])?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Logs a titled matrix to the `efp-gamess-output` logger.
pub(crate) fn log_matrix<S>(title: &str, mat: &ArrayBase<S, Ix2>)
where
    S: Data<Elem = f64>,
{
    struct MatrixDisplay<'a, S: Data<Elem = f64>>(&'a ArrayBase<S, Ix2>);

    impl<'a, S: Data<Elem = f64>> fmt::Display for MatrixDisplay<'a, S> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_matrix(f, self.0)
        }
    }

    log_subtitle(&format!("{title} ({} × {})", mat.nrows(), mat.ncols()));
    MatrixDisplay(mat)
        .to_string()
        .lines()
        .for_each(|line| {
            efpg_output!("{line}");
        });
}

/// A trait for logging efp-gamess outputs nicely.
pub(crate) trait EfpGamessOutput: fmt::Display {
    /// Logs display output nicely.
    fn log_output_display(&self) {
        let lines = self.to_string();
        lines.lines().for_each(|line| {
            efpg_output!("{line}");
        })
    }
}

// Blanket implementation
impl<T> EfpGamessOutput for T where T: fmt::Display {}
