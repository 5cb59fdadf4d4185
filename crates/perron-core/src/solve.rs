//! Steady-state solver: arbitrary-precision Gauss-Jordan elimination.
//!
//! # Overview
//!
//! For a valid transition matrix `P` with exactly one aperiodic recurrent
//! class, the stationary distribution is the row vector `π` with `πP = π`
//! and `Σπ = 1`. The solver forms the augmented system `(Pᵗ − I)` with a
//! zero right-hand column, appends the all-ones constraint row with
//! right-hand side 1, and reduces it to row-echelon form.
//!
//! # Numeric Policy
//!
//! Probability rows differ by small amounts, so elimination in native
//! floating point meets near-zero pivots and visibly wrong output. The
//! entire elimination therefore runs in [`BigDecimal`]: values are lifted
//! once on entry, every division/multiplication stays at full precision,
//! and rounding to the caller's decimal places happens exactly once when
//! the solution column is extracted. A pivot counts as zero only when its
//! magnitude is at or below the tolerance — never by exact equality.
//!
//! The solver is a pure numeric primitive. It does not check the "unique
//! aperiodic recurrent class" precondition; without it the reduced system
//! is rank-deficient and the output is undefined. That gate lives in
//! [`crate::analyze`].

use bigdecimal::{BigDecimal, FromPrimitive, One, ToPrimitive, Zero};

use crate::matrix::TransitionMatrix;

/// Default magnitude below which a pivot is treated as zero.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-9;

/// Solve `πP = π, Σπ = 1` for a valid single-recurrent aperiodic chain.
///
/// Returns one probability per state in the matrix's state ordering, each
/// rounded to `decimal_places` at extraction. On an empty matrix this is
/// an empty vector; on a chain violating the solver's precondition the
/// result is undefined (see module docs).
#[must_use]
pub fn steady_state(
    tm: &TransitionMatrix,
    pivot_tolerance: f64,
    decimal_places: u32,
) -> Vec<f64> {
    let n = tm.len();
    if n == 0 {
        return Vec::new();
    }

    let mut aug = build_augmented(tm);
    let tolerance = big(pivot_tolerance).abs();
    reduce(&mut aug, &tolerance);

    // After full reduction the solution sits in the right-hand column of
    // the first n rows: row i carries the pivot for variable i.
    (0..n)
        .map(|i| round_to(aug[i][n].to_f64().unwrap_or(0.0), decimal_places))
        .collect()
}

// ---------------------------------------------------------------------------
// Augmented system
// ---------------------------------------------------------------------------

/// Build `(Pᵗ − I)` rows with rhs 0, plus the all-ones constraint row with
/// rhs 1, lifted to `BigDecimal`.
fn build_augmented(tm: &TransitionMatrix) -> Vec<Vec<BigDecimal>> {
    let n = tm.len();
    let mut rows: Vec<Vec<BigDecimal>> = Vec::with_capacity(n + 1);

    for i in 0..n {
        let mut row: Vec<BigDecimal> = Vec::with_capacity(n + 1);
        for j in 0..n {
            // Transposed entry, minus the identity on the diagonal.
            let value = if i == j {
                tm.prob(j, i) - 1.0
            } else {
                tm.prob(j, i)
            };
            row.push(big(value));
        }
        row.push(BigDecimal::zero());
        rows.push(row);
    }

    let mut ones: Vec<BigDecimal> = Vec::with_capacity(n + 1);
    for _ in 0..=n {
        ones.push(BigDecimal::one());
    }
    rows.push(ones);

    rows
}

// ---------------------------------------------------------------------------
// Gauss-Jordan
// ---------------------------------------------------------------------------

/// Reduce `m` in place via Gauss-Jordan elimination with partial pivoting.
///
/// For each pivot position the candidate with the largest magnitude in the
/// lead column is chosen; when even that magnitude is at or below
/// `tolerance`, the column is skipped as numerically zero.
fn reduce(m: &mut [Vec<BigDecimal>], tolerance: &BigDecimal) {
    let rows = m.len();
    if rows == 0 {
        return;
    }
    let cols = m[0].len();
    let mut lead = 0;

    for row in 0..rows {
        // Advance `lead` to the next column with a usable pivot.
        let pivot_row = loop {
            if lead >= cols {
                return;
            }
            let candidate = (row..rows)
                .max_by(|&a, &b| m[a][lead].abs().cmp(&m[b][lead].abs()));
            match candidate {
                Some(i) if m[i][lead].abs() > *tolerance => break i,
                _ => lead += 1,
            }
        };

        m.swap(row, pivot_row);

        // Scale the pivot row so the lead entry becomes exactly 1.
        let pivot = m[row][lead].clone();
        for j in 0..cols {
            let scaled = &m[row][j] / &pivot;
            m[row][j] = scaled;
        }

        // Eliminate the lead column from every other row.
        let pivot_row_values = m[row].clone();
        for (i, other) in m.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = other[lead].clone();
            if factor.is_zero() {
                continue;
            }
            for j in 0..cols {
                let delta = &factor * &pivot_row_values[j];
                let updated = &other[j] - &delta;
                other[j] = updated;
            }
        }

        lead += 1;
    }
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

fn big(value: f64) -> BigDecimal {
    BigDecimal::from_f64(value).unwrap_or_default()
}

/// Round to `places` decimals; normalizes `-0.0` away so serialized output
/// is stable.
fn round_to(value: f64, places: u32) -> f64 {
    #[allow(clippy::cast_possible_wrap)]
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
