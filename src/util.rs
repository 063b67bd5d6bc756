use std::iter;

macro_rules! boxed_slice {
    ($elem:expr; $n:expr) => {
        vec![$elem; $n].into_boxed_slice()
    };
}

pub(crate) trait IterExt: Iterator {
    /// Repeat each item as many times as the corresponding duration.
    fn duration<'a>(
        self,
        durations: impl IntoIterator<Item = &'a usize> + 'a,
    ) -> impl Iterator<Item = Self::Item>;
}

impl<T: Copy, I: Iterator<Item = T>> IterExt for I {
    fn duration<'a>(
        self,
        durations: impl IntoIterator<Item = &'a usize> + 'a,
    ) -> impl Iterator<Item = Self::Item> {
        self.zip(durations)
            .flat_map(|(item, duration)| iter::repeat_n(item, *duration))
    }
}
