/// Row position of the first date where every column has a value.
/// With no columns at all, the first row counts as complete.
pub fn first_complete_row(columns: &[Vec<Option<f64>>], rows: usize) -> Option<usize> {
    (0..rows).find(|&r| columns.iter().all(|col| col[r].is_some()))
}

/// Outcome of forward-filling one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapFill {
    /// Longest run of consecutive missing cells before filling.
    pub longest_gap: usize,
    /// Cells that received a carried-forward value.
    pub filled: usize,
}

/// Replace each missing cell with the last value above it. Cells with no
/// earlier value stay missing but still count towards `longest_gap`.
pub fn forward_fill(values: &mut [Option<f64>]) -> GapFill {
    let mut out = GapFill::default();
    let mut run = 0;
    let mut last = None;

    for cell in values.iter_mut() {
        match *cell {
            Some(v) => {
                last = Some(v);
                run = 0;
            }
            None => {
                run += 1;
                out.longest_gap = out.longest_gap.max(run);
                if last.is_some() {
                    *cell = last;
                    out.filled += 1;
                }
            }
        }
    }
    out
}
