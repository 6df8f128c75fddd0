const BIT_MASK: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];
const UNSET_BIT_MASK: [u8; 8] = [
    255 - 1,
    255 - 2,
    255 - 4,
    255 - 8,
    255 - 16,
    255 - 32,
    255 - 64,
    255 - 128,
];

/// A fixed-length bitmap in LSB order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableBitmap {
    buffer: Vec<u8>,
    length: usize,
}

impl MutableBitmap {
    /// Returns a bitmap of `length` unset bits.
    pub fn from_len_zeroed(length: usize) -> Self {
        Self {
            buffer: vec![0; (length + 7) / 8],
            length,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// # Panics
    /// Panics iff `index >= self.len()`.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.length);
        self.buffer[index / 8] & BIT_MASK[index % 8] != 0
    }

    /// # Panics
    /// Panics iff `index >= self.len()`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.length);
        let byte = &mut self.buffer[index / 8];
        if value {
            *byte |= BIT_MASK[index % 8];
        } else {
            *byte &= UNSET_BIT_MASK[index % 8];
        }
    }

    /// The number of unset bits.
    pub fn unset_bits(&self) -> usize {
        let set = self.buffer.iter().map(|x| x.count_ones() as usize).sum::<usize>();
        // bits past `length` are never set
        self.length - set
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}
