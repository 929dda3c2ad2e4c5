//! Jobs handed to the worker pool

/// One record of a batch, tagged with its position in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Job<I> {
    pub payload: I,
    pub sequence_index: usize,
}

impl<I> Job<I> {
    /// Tag every item with its input position
    pub(crate) fn sequence(items: impl IntoIterator<Item = I>) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .map(|(sequence_index, payload)| Job {
                payload,
                sequence_index,
            })
            .collect()
    }
}
