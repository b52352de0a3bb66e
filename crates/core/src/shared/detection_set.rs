use serde::Serialize;

use crate::shared::bounding_box::BoundingBox;

/// Boxes detected in one frame, ordered by descending area.
///
/// "No faces" is an empty set, never an absent value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetectionSet {
    boxes: Vec<BoundingBox>,
}

impl DetectionSet {
    /// Wraps boxes that are already ranked. Use
    /// [`ResultRanker`](crate::detection::domain::result_ranker::ResultRanker)
    /// to produce them.
    pub(crate) fn from_ranked(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// The largest face, if any.
    pub fn largest(&self) -> Option<&BoundingBox> {
        self.boxes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundingBox> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[BoundingBox] {
        &self.boxes
    }

    pub fn into_vec(self) -> Vec<BoundingBox> {
        self.boxes
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a BoundingBox;
    type IntoIter = std::slice::Iter<'a, BoundingBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
