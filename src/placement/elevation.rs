use crate::plan::{Piece, PieceId, Plan};

/// Margin under which a piece corner still counts as inside a supporting piece.
const SUPPORT_MARGIN: f64 = 0.1;

/// Returns the elevation that puts `piece` on top of the highest piece
/// surrounding its footprint, or `None` if it should stay where it is.
///
/// Only pieces lying on the floor are lifted, and doors and windows never
/// are. `ignored` lists the pieces moved along with `piece`.
#[must_use]
pub fn adjust_piece_elevation(plan: &Plan, piece: &Piece, ignored: &[PieceId]) -> Option<f64> {
    if piece.is_door_or_window() || piece.elevation != 0.0 {
        return None;
    }
    let level = plan.selected_level();
    let corners = piece.points();
    let support = plan
        .furniture()
        .iter()
        .filter(|(id, other)| {
            !ignored.contains(id)
                && other.visible
                && !other.is_door_or_window()
                && plan.is_piece_at_level(other, level)
                && corners.iter().all(|corner| other.contains_point(corner, SUPPORT_MARGIN))
        })
        .map(|(_, other)| {
            let delta = plan.level_elevation(other.level) - plan.level_elevation(piece.level);
            other.elevation + other.height_in_plan() + delta
        })
        .max_by(f64::total_cmp)?;
    Some(support.max(0.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn piece_rests_on_the_highest_support() {
        let mut plan = Plan::new();
        plan.add_piece(Piece::new("table", 100.0, 100.0, 120.0, 80.0, 75.0));
        let mut shelf = Piece::new("shelf", 100.0, 100.0, 60.0, 40.0, 10.0);
        shelf.elevation = 75.0;
        plan.add_piece(shelf);
        let vase = Piece::new("vase", 110.0, 105.0, 10.0, 10.0, 30.0);
        assert_relative_eq!(adjust_piece_elevation(&plan, &vase, &[]).unwrap(), 85.0);
    }

    #[test]
    fn piece_outside_supports_stays_on_the_floor() {
        let mut plan = Plan::new();
        let table = plan.add_piece(Piece::new("table", 100.0, 100.0, 120.0, 80.0, 75.0));
        let lamp = Piece::new("lamp", 155.0, 100.0, 20.0, 20.0, 30.0);
        assert!(adjust_piece_elevation(&plan, &lamp, &[]).is_none());
        let vase = Piece::new("vase", 100.0, 100.0, 10.0, 10.0, 30.0);
        assert!(adjust_piece_elevation(&plan, &vase, &[table]).is_none());
    }
}
