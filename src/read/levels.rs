use crate::encoding::get_length;
use crate::encoding::hybrid_rle::{HybridRleDecoder, Run};
use crate::error::{Error, Result};

/// Returns the number of bits needed to store the given maximum definition or repetition level.
#[inline]
pub fn get_bit_width(max_level: i16) -> u32 {
    16 - max_level.leading_zeros()
}

/// Splits the length-prefixed levels at the start of a v1 page from the rest of the page.
/// Levels of a column whose maximum level is 0 are not written and consume no bytes.
pub fn split_levels_v1(buffer: &[u8], max_level: i16) -> Result<(&[u8], &[u8])> {
    if max_level == 0 {
        return Ok((&buffer[..0], buffer));
    }
    let length = get_length(buffer)? as usize;
    let buffer = &buffer[4..];
    if buffer.len() < length {
        return Err(Error::oos(format!(
            "The levels declare {} bytes but the page has only {}",
            length,
            buffer.len()
        )));
    }
    Ok(buffer.split_at(length))
}

/// Receives the slots of a batch as runs of present or null slots, in order.
/// Offsets are relative to the start of the batch.
pub(crate) trait SlotVisitor {
    fn present(&mut self, offset: usize, length: usize) -> Result<()>;

    fn null(&mut self, offset: usize, length: usize) -> Result<()>;
}

#[inline]
fn visit<V: SlotVisitor>(
    visitor: &mut V,
    present: bool,
    offset: usize,
    length: usize,
) -> Result<()> {
    if present {
        visitor.present(offset, length)
    } else {
        visitor.null(offset, length)
    }
}

/// Decoder of the definition levels of a flat column. A slot is present iff its level is
/// the maximum definition level.
#[derive(Debug, Clone)]
pub(crate) struct DefinitionLevelReader<'a> {
    // `None` when the column is required: all slots are present
    levels: Option<HybridRleDecoder<'a>>,
    max_level: u32,
}

impl<'a> DefinitionLevelReader<'a> {
    pub fn try_new(levels: &'a [u8], max_level: i16, num_values: usize) -> Result<Self> {
        if max_level < 0 {
            return Err(Error::InvalidParameter(format!(
                "The maximum definition level cannot be negative (got {})",
                max_level
            )));
        }
        let levels = if max_level == 0 {
            None
        } else {
            Some(HybridRleDecoder::try_new(
                levels,
                get_bit_width(max_level),
                num_values,
            )?)
        };
        Ok(Self {
            levels,
            max_level: max_level as u32,
        })
    }

    /// Decodes the next `length` levels, passing runs of present and null slots to `visitor`.
    pub fn read_batch<V: SlotVisitor>(&mut self, length: usize, visitor: &mut V) -> Result<()> {
        let levels = match self.levels.as_mut() {
            Some(levels) => levels,
            None => return visitor.present(0, length),
        };

        let mut done = 0;
        while done < length {
            match levels.next_run(length - done)? {
                Run::Repeated { value, length: run } => {
                    visit(visitor, value == self.max_level, done, run)?;
                    done += run;
                }
                Run::Bitpacked(values) => {
                    // group consecutive slots of the same kind
                    let mut run_start = done;
                    let mut run_present = None;
                    for level in values {
                        let present = level == self.max_level;
                        match run_present {
                            Some(previous) if previous != present => {
                                visit(visitor, previous, run_start, done - run_start)?;
                                run_start = done;
                                run_present = Some(present);
                            }
                            None => run_present = Some(present),
                            _ => {}
                        }
                        done += 1;
                    }
                    if let Some(present) = run_present {
                        visit(visitor, present, run_start, done - run_start)?;
                    }
                }
            }
        }
        Ok(())
    }
}
