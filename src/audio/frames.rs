/// Number of full frames in a signal of `len` samples. Trailing samples that
/// do not fill a frame are dropped.
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if len < frame_size {
        0
    } else {
        (len - frame_size) / hop_size + 1
    }
}

/// Left-to-right frames over a borrowed signal, starting at sample 0.
///
/// Cloning yields an independent iterator at the same position, so a caller
/// can restart segmentation by keeping a clone of the fresh iterator.
#[derive(Clone, Debug)]
pub struct Frames<'a> {
    samples: &'a [f32],
    frame_size: usize,
    hop_size: usize,
    pos: usize,
}

impl<'a> Frames<'a> {
    pub fn new(samples: &'a [f32], frame_size: usize, hop_size: usize) -> Self {
        Self {
            samples,
            frame_size,
            hop_size,
            pos: 0,
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.pos.checked_add(self.frame_size)?;
        if end > self.samples.len() {
            return None;
        }
        let frame = &self.samples[self.pos..end];
        self.pos += self.hop_size;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.pos);
        let n = frame_count(remaining, self.frame_size, self.hop_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl std::iter::FusedIterator for Frames<'_> {}
