//! Indexed scripted responses and their delivery cursor.

use crate::error::PolicyViolation;

/// Number of response slots.
pub const RESPONSE_SLOTS: usize = 11;

/// Fixed table of scripted responses.
///
/// Slot 0 is served as soon as the connection opens; later slots follow in
/// index order, skipping empty ones. Delivery position is tracked as the
/// current slot plus the offset already served from it.
#[derive(Clone, Debug, Default)]
pub struct ResponseSlots<'a> {
    slots: [Option<&'a [u8]>; RESPONSE_SLOTS],
    current: usize,
    offset: usize,
}

impl<'a> ResponseSlots<'a> {
    /// Store `data` in slot `index`, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation::ResponseIndexOutOfRange`] if `index` is not
    /// below [`RESPONSE_SLOTS`].
    pub fn store(&mut self, index: usize, data: &'a [u8]) -> Result<(), PolicyViolation> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PolicyViolation::ResponseIndexOutOfRange {
                index,
                capacity: RESPONSE_SLOTS,
            })?;
        *slot = Some(data);
        Ok(())
    }

    /// Response stored in slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a [u8]> { self.slots.get(index).copied().flatten() }

    /// Indices of populated slots in delivery order.
    pub fn populated(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|_| index))
    }

    /// Returns `true` if no slot is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.slots.iter().all(Option::is_none) }

    /// Slot currently being served.
    #[must_use]
    pub fn current(&self) -> usize { self.current }

    /// Copy the next chunk of response bytes into `buf`.
    ///
    /// Advances to the next populated slot once the current one is drained.
    /// Returns `0` when every slot has been served.
    pub fn fill(&mut self, buf: &mut [u8]) -> usize {
        while let Some(slot) = self.slots.get(self.current) {
            let pending = slot
                .and_then(|data| data.get(self.offset..))
                .unwrap_or_default();
            if pending.is_empty() {
                self.current += 1;
                self.offset = 0;
                continue;
            }
            let n = pending.len().min(buf.len());
            let (dst, _) = buf.split_at_mut(n);
            let (src, _) = pending.split_at(n);
            dst.copy_from_slice(src);
            self.offset += n;
            return n;
        }
        0
    }

    /// Returns `true` once every populated slot has been served.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .skip(self.current)
            .all(|(index, slot)| {
                let served = if index == self.current { self.offset } else { 0 };
                slot.is_none_or(|data| data.len() <= served)
            })
    }
}
