use std::cmp::Reverse;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::detection_set::DetectionSet;

/// Orders boxes largest-first so callers can take the most prominent face.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResultRanker;

impl ResultRanker {
    pub fn new() -> Self {
        Self
    }

    /// Sort by descending `width * height`. Equal areas keep input order.
    pub fn rank(&self, mut boxes: Vec<BoundingBox>) -> DetectionSet {
        boxes.sort_by_key(|b| Reverse(b.area()));
        DetectionSet::from_ranked(boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox::new(x, 0, w, h)
    }

    #[test]
    fn test_sorted_by_descending_area() {
        let ranked = ResultRanker::new().rank(vec![bbox(0, 2, 2), bbox(1, 10, 10), bbox(2, 5, 5)]);

        let areas: Vec<i64> = ranked.iter().map(BoundingBox::area).collect();
        assert_eq!(areas, vec![100, 25, 4]);
    }

    #[test]
    fn test_equal_areas_keep_input_order() {
        // 4x6 and 6x4 and 3x8 all cover 24 pixels
        let ranked = ResultRanker::new().rank(vec![
            bbox(1, 4, 6),
            bbox(2, 6, 4),
            bbox(3, 1, 1),
            bbox(4, 3, 8),
        ]);

        let xs: Vec<i32> = ranked.iter().map(|b| b.x).collect();
        assert_eq!(xs, vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let ranked = ResultRanker::new().rank(Vec::new());
        assert!(ranked.is_empty());
        assert_eq!(ranked, DetectionSet::empty());
    }

    #[test]
    fn test_zero_area_box_is_not_empty_set() {
        let ranked = ResultRanker::new().rank(vec![bbox(0, 0, 0)]);
        assert_eq!(ranked.len(), 1);
    }
}
