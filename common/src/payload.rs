use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Text bytes that fit in the first cell next to the 32-bit opcode
/// (1023-bit cell, byte-aligned).
const FIRST_CELL_TEXT_BYTES: usize = 123;
/// Text bytes per continuation cell.
const NEXT_CELL_TEXT_BYTES: usize = 127;

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
/// Header flags: no index table, CRC32C trailer present.
const BOC_FLAGS_CRC: u8 = 0x40;

/// Encode a chat message as a text-comment payload: a single-root
/// bag-of-cells whose root carries a 32-bit zero opcode followed by the
/// UTF-8 text, overflowing into a chain of reference cells for long
/// messages.
///
/// Framing matches the reference encoder's defaults (no index, CRC32C
/// appended), so payloads are byte-identical to those produced by the
/// wallet tooling.
pub fn encode_comment(text: &str) -> Vec<u8> {
    serialize_boc(&comment_cells(text.as_bytes()))
}

/// `encode_comment`, base64-encoded the way the wallet bridge expects.
pub fn encode_comment_base64(text: &str) -> String {
    STANDARD.encode(encode_comment(text))
}

/// Split text into the comment cell chain. Cell `i` references cell
/// `i + 1`; the last cell has no references.
fn comment_cells(text: &[u8]) -> Vec<Vec<u8>> {
    let split = text.len().min(FIRST_CELL_TEXT_BYTES);
    let (head, mut rest) = text.split_at(split);

    let mut root = Vec::with_capacity(4 + head.len());
    root.extend_from_slice(&[0, 0, 0, 0]);
    root.extend_from_slice(head);

    let mut cells = vec![root];
    while !rest.is_empty() {
        let take = rest.len().min(NEXT_CELL_TEXT_BYTES);
        let (chunk, tail) = rest.split_at(take);
        cells.push(chunk.to_vec());
        rest = tail;
    }
    cells
}

/// Serialize a linear cell chain as a standard bag-of-cells.
///
/// Cell data here is always byte-aligned, so the descriptor pair is
/// simply (ref count, 2 * data length). Chat-sized payloads stay well
/// under the 255-cell reach of single-byte cell references.
fn serialize_boc(cells: &[Vec<u8>]) -> Vec<u8> {
    debug_assert!(cells.len() <= u8::MAX as usize);

    let total_cells_size: usize = cells
        .iter()
        .enumerate()
        .map(|(i, data)| 2 + data.len() + usize::from(i + 1 < cells.len()))
        .sum();
    let offset_width = byte_width(total_cells_size);

    let mut out = Vec::with_capacity(12 + total_cells_size + 4);
    out.extend_from_slice(&BOC_MAGIC);
    out.push(BOC_FLAGS_CRC | 1); // 1-byte cell references
    out.push(offset_width as u8);
    out.push(cells.len() as u8);
    out.push(1); // roots
    out.push(0); // absent
    out.extend_from_slice(&(total_cells_size as u64).to_be_bytes()[8 - offset_width..]);
    out.push(0); // root index

    for (i, data) in cells.iter().enumerate() {
        let has_ref = i + 1 < cells.len();
        out.push(u8::from(has_ref));
        out.push(2 * data.len() as u8);
        out.extend_from_slice(data);
        if has_ref {
            out.push(i as u8 + 1);
        }
    }

    out.extend_from_slice(&crc32c(&out).to_le_bytes());
    out
}

fn byte_width(value: usize) -> usize {
    let value = value.max(1) as u64;
    ((u64::BITS - value.leading_zeros() + 7) / 8) as usize
}

/// CRC-32C (Castagnoli), reflected, as used by the BOC trailer.
fn crc32c(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xffff_ffff;
    for &b in data {
        crc ^= b as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0x82f6_3b78
            } else {
                crc >> 1
            };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_comment_matches_reference_bytes() {
        assert_eq!(
            encode_comment_base64("hello"),
            "te6cckEBAQEACwAAEgAAAABoZWxsb5oNank="
        );
    }

    #[test]
    fn short_comments() {
        assert_eq!(encode_comment_base64("hi"), "te6cckEBAQEACAAADAAAAABoaeh7Muk=");
        assert_eq!(encode_comment_base64(""), "te6cckEBAQEABgAACAAAAADjAK8P");
    }

    #[test]
    fn long_comment_snakes_into_second_cell() {
        let text = "a".repeat(200);
        let boc = encode_comment(&text);
        assert_eq!(boc[..4], BOC_MAGIC);
        // cell count
        assert_eq!(boc[6], 2);
        assert_eq!(
            STANDARD.encode(&boc),
            "te6cckEBAgEA0QAB/gAAAABhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFh\
             YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFh\
             YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWEBAJphYWFhYWFh\
             YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFh\
             YWFhYWFhYWFhYWFhYWFhYWFhYWFhYan9YsE="
        );
    }

    #[test]
    fn exact_first_cell_boundary_stays_single() {
        let boc = encode_comment(&"b".repeat(123));
        assert_eq!(boc[6], 1);
        let boc = encode_comment(&"b".repeat(124));
        assert_eq!(boc[6], 2);
    }

    #[test]
    fn utf8_text_is_carried_verbatim() {
        let boc = encode_comment("héllo ✓");
        let needle = "héllo ✓".as_bytes();
        assert!(boc.windows(needle.len()).any(|w| w == needle));
    }
}
