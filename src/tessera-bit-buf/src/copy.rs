use crate::{BitWriter, Error, WORD_BITS};

/// Appends `bit_length` bits of `src`, starting at `src_bit_position`,
/// to the cursor of `dst`.
///
/// Neither side needs to be word-aligned. The copy runs in three
/// phases: the head up to the next word boundary of `src` goes
/// through a regular masked write, the aligned body is copied one
/// whole word at a time, and the remaining tail bits are written from
/// the final source word.
///
/// The source range must be within the bits written to `src`.
/// Capacity of `dst` is checked (and grown, if allowed) before any
/// bit is copied, so a failed copy leaves `dst` untouched.
pub fn copy_bits(
    dst: &mut BitWriter,
    src: &BitWriter,
    src_bit_position: usize,
    bit_length: usize,
) -> Result<(), Error> {
    let src_end = src_bit_position.saturating_add(bit_length);
    if src_end > src.bit_position() {
        return Err(Error::EndOfStream {
            requested: src_end,
            length: src.bit_position(),
        });
    }
    if bit_length == 0 {
        return Ok(());
    }

    dst.reserve(bit_length)?;

    let words = src.words();
    let mut index = src_bit_position / WORD_BITS;

    // Head: bring the source position up to a word boundary.
    let offset = src_bit_position % WORD_BITS;
    let head = (WORD_BITS - offset).min(bit_length);
    dst.write(words[index] >> offset, head as u32)?;

    let mut remaining = bit_length - head;
    index += 1;

    // Body: whole words, no masking needed.
    while remaining >= WORD_BITS {
        dst.write_u64(words[index])?;

        remaining -= WORD_BITS;
        index += 1;
    }

    // Tail: the low bits of the final word.
    if remaining != 0 {
        dst.write(words[index], remaining as u32)?;
    }

    Ok(())
}
