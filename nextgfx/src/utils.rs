/// Converts an RGB888 pixel into an RGB332 byte (`RRRGGGBB`) by keeping the top bits of each
/// channel.
#[inline]
pub const fn rgb888_to_rgb332([r, g, b]: [u8; 3]) -> u8 {
    ((r >> 5) << 5) | ((g >> 5) << 2) | (b >> 6)
}

/// Expands an RGB332 byte back to RGB888 by bit replication.
#[inline]
pub const fn rgb332_to_rgb888(pixel: u8) -> [u8; 3] {
    let r = pixel >> 5;
    let g = (pixel >> 2) & 0b111;
    let b = pixel & 0b11;

    [
        (r << 5) | (r << 2) | (r >> 1),
        (g << 5) | (g << 2) | (g >> 1),
        (b << 6) | (b << 4) | (b << 2) | b,
    ]
}

/// Packs two 4-bit palette indices into one byte, left pixel in the high nibble.
#[inline]
pub const fn pack_nibbles(left: u8, right: u8) -> u8 {
    ((left & 0x0F) << 4) | (right & 0x0F)
}

/// Splits a packed tile byte into its `(left, right)` palette indices.
#[inline]
pub const fn unpack_nibbles(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// `ceil(len / chunk)`, the number of banks or pages a buffer of `len` bytes needs.
#[inline]
pub const fn chunk_count(len: usize, chunk: usize) -> usize {
    len.div_ceil(chunk)
}
