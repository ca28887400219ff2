//! Cursor over the upload payload.

/// Upload payload and the number of bytes already handed to the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct UploadBuffer<'a> {
    data: &'a [u8],
    written: usize,
}

impl<'a> UploadBuffer<'a> {
    /// Wrap `data` with nothing delivered yet.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self { Self { data, written: 0 } }

    /// Full payload.
    #[must_use]
    pub fn data(&self) -> &'a [u8] { self.data }

    /// Bytes already delivered.
    #[must_use]
    pub fn written(&self) -> usize { self.written }

    /// Bytes still to deliver.
    #[must_use]
    pub fn remaining(&self) -> usize { self.data.len() - self.written }

    /// Copy the next chunk into `buf`, returning how many bytes were copied.
    ///
    /// Returns `0` once the payload is exhausted.
    pub fn fill(&mut self, buf: &mut [u8]) -> usize {
        let pending = self.data.get(self.written..).unwrap_or_default();
        let n = pending.len().min(buf.len());
        let (dst, _) = buf.split_at_mut(n);
        let (src, _) = pending.split_at(n);
        dst.copy_from_slice(src);
        self.written += n;
        n
    }
}
