use std::iter;

/// Per-frame voicing decision of an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicingMask(Box<[bool]>);

impl FromIterator<bool> for VoicingMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl VoicingMask {
    pub fn new(voiced: Vec<bool>) -> Self {
        Self(voiced.into())
    }
    pub fn voiced(&self) -> &[bool] {
        &self.0
    }
    /// Number of frames in the utterance.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn voiced_count(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    /// Keep the items on voiced frames.
    pub fn filter<'a, T: 'a>(
        &'a self,
        items: impl 'a + IntoIterator<Item = T>,
    ) -> impl 'a + Iterator<Item = T> {
        items
            .into_iter()
            .zip(self.0.iter())
            .filter_map(|(item, voiced)| voiced.then_some(item))
    }

    /// Spread `voiced_items` over the voiced frames, putting `default` on the others.
    ///
    /// Voiced frames left over once `voiced_items` runs out also get `default`.
    pub fn fill<T: Clone>(&self, voiced_items: impl IntoIterator<Item = T>, default: T) -> Vec<T> {
        let mut voiced_items = voiced_items.into_iter();
        self.0
            .iter()
            .map(|voiced| match *voiced {
                true => voiced_items.next().unwrap_or_else(|| default.clone()),
                false => default.clone(),
            })
            .collect()
    }

    /// For every frame, the number of voiced frames between it and the closest
    /// unvoiced frame (or utterance edge) on the left and on the right.
    ///
    /// Unvoiced frames get `(0, 0)`.
    pub fn boundary_distances(&self) -> Vec<(usize, usize)> {
        let mut result = vec![(0, 0); self.0.len()];
        let mut run_start = None;

        // a trailing unvoiced sentinel closes the last run
        for (frame, voiced) in self.0.iter().chain(iter::once(&false)).enumerate() {
            match (*voiced, run_start) {
                (true, None) => run_start = Some(frame),
                (false, Some(start)) => {
                    for (inner, distance) in result[start..frame].iter_mut().enumerate() {
                        *distance = (inner, frame - start - inner - 1);
                    }
                    run_start = None;
                }
                _ => (),
            }
        }

        result
    }
}
