/// Tracks which slots of a batch are null, independently of the vector's own validity.
///
/// Every slot starts as not null; the null count always matches the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullabilityHolder {
    is_null: Vec<u8>,
    num_nulls: usize,
}

impl NullabilityHolder {
    pub fn new(size: usize) -> Self {
        Self {
            is_null: vec![0; size],
            num_nulls: 0,
        }
    }

    /// The number of slots this holder tracks.
    pub fn size(&self) -> usize {
        self.is_null.len()
    }

    #[inline]
    pub fn set_null(&mut self, index: usize) {
        if self.is_null[index] == 0 {
            self.is_null[index] = 1;
            self.num_nulls += 1;
        }
    }

    #[inline]
    pub fn set_not_null(&mut self, index: usize) {
        if self.is_null[index] == 1 {
            self.is_null[index] = 0;
            self.num_nulls -= 1;
        }
    }

    /// Marks `count` slots starting at `start` as null.
    pub fn set_nulls(&mut self, start: usize, count: usize) {
        let slots = &mut self.is_null[start..start + count];
        let already = slots.iter().filter(|x| **x == 1).count();
        slots.iter_mut().for_each(|x| *x = 1);
        self.num_nulls += count - already;
    }

    /// Marks `count` slots starting at `start` as not null.
    pub fn set_not_nulls(&mut self, start: usize, count: usize) {
        let slots = &mut self.is_null[start..start + count];
        let already = slots.iter().filter(|x| **x == 1).count();
        slots.iter_mut().for_each(|x| *x = 0);
        self.num_nulls -= already;
    }

    #[inline]
    pub fn is_null_at(&self, index: usize) -> bool {
        self.is_null[index] == 1
    }

    pub fn has_nulls(&self) -> bool {
        self.num_nulls > 0
    }

    pub fn num_nulls(&self) -> usize {
        self.num_nulls
    }

    /// Marks every slot as not null.
    pub fn reset(&mut self) {
        self.is_null.iter_mut().for_each(|x| *x = 0);
        self.num_nulls = 0;
    }
}
