/// Boolean selection over the elements of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Mask(Vec<bool>);

impl Mask {
    /// A mask selecting no element.
    pub(super) fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// A mask selecting the elements for which `predicate` holds.
    pub(super) fn from_fn(len: usize, predicate: impl FnMut(usize) -> bool) -> Self {
        Self((0..len).map(predicate).collect())
    }

    pub(super) fn contains(&self, i: usize) -> bool {
        self.0[i]
    }

    pub(super) fn insert(&mut self, i: usize) {
        self.0[i] = true;
    }

    pub(super) fn remove(&mut self, i: usize) {
        self.0[i] = false;
    }

    pub(super) fn count(&self) -> usize {
        self.0.iter().filter(|&&selected| selected).count()
    }

    pub(super) fn is_empty(&self) -> bool {
        !self.0.contains(&true)
    }

    /// Indices of the selected elements, in order.
    pub(super) fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &selected)| selected.then_some(i))
            .collect()
    }

    /// Elements selected here but not in `other`.
    pub(super) fn and_not(&self, other: &Self) -> Self {
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| a && !b)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection() {
        let mut mask = Mask::from_fn(5, |i| i % 2 == 0);
        assert_eq!(mask.indices(), vec![0, 2, 4]);
        mask.remove(2);
        mask.insert(1);
        assert_eq!(mask.indices(), vec![0, 1, 4]);
        assert_eq!(mask.count(), 3);
        assert!(mask.contains(1) && !mask.contains(2));
    }

    #[test]
    fn difference() {
        let all = Mask::from_fn(3, |_| true);
        let first = Mask::from_fn(3, |i| i == 0);
        assert_eq!(all.and_not(&first).indices(), vec![1, 2]);
        assert!(Mask::none(3).is_empty());
    }
}
