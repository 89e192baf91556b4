//! Grid layout calculation
//!
//! This module finds how many copies of a cut piece fit on a stock sheet,
//! picks between the original and the 90° rotated orientation, and places
//! every copy on a grid centered on the sheet.

use crate::constants::{DEFAULT_TECHNICAL_MARGIN_MM, MAX_COPIES_PER_SHEET};

use super::{GridCandidate, Imposition, InfeasibleReason, LayoutOrientation, LayoutResult, Position};

// =============================================================================
// Engine Entry Points
// =============================================================================

/// Compute the best-fit layout of a cut piece on a stock sheet.
///
/// # Arguments
/// * `sheet_width` / `sheet_height` - Full stock sheet size
/// * `cut_width` / `cut_height` - Piece size including bleed
/// * `technical_margin` - Margin subtracted from all four sheet edges
///
/// Returns [`Imposition::Infeasible`] when the cut size is not positive,
/// the margin leaves no usable area, or the best grid holds more than
/// [`MAX_COPIES_PER_SHEET`] copies. Never panics on bad input.
pub fn compute(
    sheet_width: f64,
    sheet_height: f64,
    cut_width: f64,
    cut_height: f64,
    technical_margin: f64,
) -> Imposition {
    // Negated comparisons so NaN lands on the infeasible side
    if !(cut_width > 0.0) || !(cut_height > 0.0) {
        return Imposition::Infeasible(InfeasibleReason::NonPositiveCut);
    }

    let (usable_width, usable_height) = usable_area(sheet_width, sheet_height, technical_margin);
    if !(usable_width > 0.0) || !(usable_height > 0.0) {
        return Imposition::Infeasible(InfeasibleReason::NoUsableArea);
    }

    let [original, rotated] =
        evaluate_candidates(usable_width, usable_height, cut_width, cut_height);
    let chosen = choose_candidate(original, rotated);
    if chosen.total() > MAX_COPIES_PER_SHEET {
        return Imposition::Infeasible(InfeasibleReason::TooManyCopies);
    }

    let (copy_width, copy_height) = match chosen.orientation {
        LayoutOrientation::Original => (cut_width, cut_height),
        LayoutOrientation::Rotated => (cut_height, cut_width),
    };

    Imposition::Feasible(build_layout(
        chosen,
        copy_width,
        copy_height,
        sheet_width,
        sheet_height,
    ))
}

/// [`compute`] with the standard 5 mm technical margin.
pub fn compute_default_margin(
    sheet_width: f64,
    sheet_height: f64,
    cut_width: f64,
    cut_height: f64,
) -> Imposition {
    compute(
        sheet_width,
        sheet_height,
        cut_width,
        cut_height,
        DEFAULT_TECHNICAL_MARGIN_MM,
    )
}

// =============================================================================
// Candidate Evaluation
// =============================================================================

/// Sheet area left after removing the technical margin from every edge.
pub fn usable_area(sheet_width: f64, sheet_height: f64, technical_margin: f64) -> (f64, f64) {
    (
        sheet_width - 2.0 * technical_margin,
        sheet_height - 2.0 * technical_margin,
    )
}

/// Evaluate the original and rotated grids, in that order.
pub fn evaluate_candidates(
    usable_width: f64,
    usable_height: f64,
    cut_width: f64,
    cut_height: f64,
) -> [GridCandidate; 2] {
    [
        GridCandidate {
            orientation: LayoutOrientation::Original,
            columns: fit_count(usable_width, cut_width),
            rows: fit_count(usable_height, cut_height),
        },
        GridCandidate {
            orientation: LayoutOrientation::Rotated,
            columns: fit_count(usable_width, cut_height),
            rows: fit_count(usable_height, cut_width),
        },
    ]
}

/// Pick the winning orientation. The original wins ties.
pub fn choose_candidate(original: GridCandidate, rotated: GridCandidate) -> GridCandidate {
    if rotated.total() > original.total() {
        rotated
    } else {
        original
    }
}

/// Number of whole pieces of `size` that fit in `available`.
fn fit_count(available: f64, size: f64) -> usize {
    // Both operands are positive here; `as` saturates on overflow
    (available / size).floor() as usize
}

// =============================================================================
// Grid Placement
// =============================================================================

fn build_layout(
    chosen: GridCandidate,
    copy_width: f64,
    copy_height: f64,
    sheet_width: f64,
    sheet_height: f64,
) -> LayoutResult {
    let GridCandidate { orientation, columns, rows } = chosen;

    let grid_width = columns as f64 * copy_width;
    let grid_height = rows as f64 * copy_height;

    // Centered on the full sheet, not on the usable area
    let offset_x = (sheet_width - grid_width) / 2.0;
    let offset_y = (sheet_height - grid_height) / 2.0;

    let positions = (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |col| {
                Position::new(
                    offset_x + col as f64 * copy_width,
                    offset_y + row as f64 * copy_height,
                )
            })
        })
        .collect();

    LayoutResult {
        orientation,
        columns,
        rows,
        total: columns.saturating_mul(rows),
        copy_width,
        copy_height,
        grid_width,
        grid_height,
        offset_x,
        offset_y,
        positions,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn feasible(imposition: Imposition) -> LayoutResult {
        match imposition {
            Imposition::Feasible(layout) => layout,
            other => panic!("expected a feasible layout, got {:?}", other),
        }
    }

    #[test]
    fn test_usable_area() {
        assert_eq!(usable_area(210.0, 297.0, 5.0), (200.0, 287.0));
        assert_eq!(usable_area(10.0, 10.0, 5.0), (0.0, 0.0));
    }

    #[test]
    fn test_evaluate_candidates() {
        let [original, rotated] = evaluate_candidates(200.0, 287.0, 100.0, 40.0);

        assert_eq!(original.orientation, LayoutOrientation::Original);
        assert_eq!((original.columns, original.rows), (2, 7));
        assert_eq!(original.total(), 14);

        assert_eq!(rotated.orientation, LayoutOrientation::Rotated);
        assert_eq!((rotated.columns, rotated.rows), (5, 2));
        assert_eq!(rotated.total(), 10);
    }

    #[test]
    fn test_original_wins_ties() {
        let original = GridCandidate {
            orientation: LayoutOrientation::Original,
            columns: 1,
            rows: 5,
        };
        let rotated = GridCandidate {
            orientation: LayoutOrientation::Rotated,
            columns: 5,
            rows: 1,
        };
        assert_eq!(choose_candidate(original, rotated), original);
    }

    #[test]
    fn test_rotated_wins_when_strictly_better() {
        // 250x100 on a 190x290 usable area only fits turned
        let layout = feasible(compute(200.0, 300.0, 250.0, 100.0, 5.0));
        assert_eq!(layout.orientation, LayoutOrientation::Rotated);
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.rows, 1);
        assert_eq!(layout.copy_width, 100.0);
        assert_eq!(layout.copy_height, 250.0);
    }

    #[test]
    fn test_grid_is_centered_on_full_sheet() {
        let layout = feasible(compute(210.0, 297.0, 100.0, 40.0, 5.0));

        assert_eq!(layout.grid_width, 200.0);
        assert_eq!(layout.grid_height, 280.0);
        assert_eq!(layout.offset_x, 5.0);
        assert_eq!(layout.offset_y, 8.5);
    }

    #[test]
    fn test_positions_are_row_major() {
        let layout = feasible(compute(210.0, 297.0, 100.0, 40.0, 5.0));

        assert_eq!(layout.positions[0], Position::new(5.0, 8.5));
        assert_eq!(layout.positions[1], Position::new(105.0, 8.5));
        assert_eq!(layout.positions[2], Position::new(5.0, 48.5));
        assert_eq!(layout.grid_position(3), Some(crate::layout::GridPosition::new(1, 1)));
        assert_eq!(layout.grid_position(14), None);
    }

    #[test]
    fn test_nan_is_infeasible() {
        assert_eq!(
            compute(210.0, 297.0, f64::NAN, 40.0, 5.0),
            Imposition::Infeasible(InfeasibleReason::NonPositiveCut)
        );
        assert_eq!(
            compute(f64::NAN, 297.0, 100.0, 40.0, 5.0),
            Imposition::Infeasible(InfeasibleReason::NoUsableArea)
        );
    }

    #[test]
    fn test_copy_limit_boundary() {
        // 1 mm pieces on a 250 x 200 usable area give exactly the limit
        let layout = feasible(compute(260.0, 210.0, 1.0, 1.0, 5.0));
        assert_eq!(layout.total, MAX_COPIES_PER_SHEET);

        assert_eq!(
            compute(261.0, 210.0, 1.0, 1.0, 5.0),
            Imposition::Infeasible(InfeasibleReason::TooManyCopies)
        );
    }

    #[test]
    fn test_default_margin_is_five() {
        assert_eq!(
            compute_default_margin(210.0, 297.0, 100.0, 40.0),
            compute(210.0, 297.0, 100.0, 40.0, 5.0)
        );
    }
}
