/// Rows of the optimized keyboard region.
pub const ROW_COUNT: usize = 3;

/// Columns of the optimized keyboard region.
pub const COL_COUNT: usize = 10;

/// Number of keys under optimization (the 3x10 center block).
pub const KEY_COUNT: usize = 30;

/// Size of the packed layout array. Position slots occupy indices
/// `0..KEY_COUNT`; cap slots occupy their ASCII codes (',' = 44 up to
/// 'Z' = 90), so both views fit in one array without overlap.
pub const MAX_KEY_CODE: usize = 92;

/// Every legal key value, in ascending ASCII order.
pub const CAP_SET: [u8; KEY_COUNT] = [
    b',', b'.', b'/', b';', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K',
    b'L', b'M', b'N', b'O', b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z',
];

#[inline(always)]
pub fn is_legal_cap(cap: u8) -> bool {
    cap.is_ascii_uppercase() || cap == b',' || cap == b'.' || cap == b';' || cap == b'/'
}

#[inline(always)]
pub fn is_legal_pos(pos: u8) -> bool {
    (pos as usize) < KEY_COUNT
}

#[inline(always)]
pub fn col_of(pos: u8) -> u8 {
    pos % COL_COUNT as u8
}

#[inline(always)]
pub fn row_of(pos: u8) -> u8 {
    pos / COL_COUNT as u8
}
