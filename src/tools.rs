use std::ops::Range;

/// Splits a slice into maximal runs of consecutive elements sharing a key,
/// yielding each key with the index range of its run.
pub struct Runs<'a, T, F> {
    slice: &'a [T],
    pos: usize,
    key: F,
}

impl<'a, T, F, K> Runs<'a, T, F>
where
    F: FnMut(&T) -> K,
    K: PartialEq,
{
    pub fn new(slice: &'a [T], key: F) -> Self {
        Runs {
            slice,
            pos: 0,
            key,
        }
    }
}

impl<'a, T, F, K> Iterator for Runs<'a, T, F>
where
    F: FnMut(&T) -> K,
    K: PartialEq,
{
    type Item = (K, Range<usize>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let key = (self.key)(self.slice.get(start)?);
        let mut end = start + 1;
        while end < self.slice.len() && (self.key)(&self.slice[end]) == key {
            end += 1;
        }
        self.pos = end;
        Some((key, start..end))
    }
}
