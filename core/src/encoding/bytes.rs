//! Integer, compact-size and script-push writers.

/// Append a `u32` in little-endian order.
pub fn write_u32_le(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Append a `u32` in big-endian order.
pub fn write_u32_be(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Append a `u64` in little-endian order.
pub fn write_u64_le(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Append `n` as a compact size (Bitcoin varint).
///
/// | range                  | encoding              |
/// |------------------------|-----------------------|
/// | `0..=0xFC`             | 1 byte                |
/// | `0xFD..=0xFFFF`        | `0xFD` + u16 LE       |
/// | `0x1_0000..=0xFFFF_FFFF` | `0xFE` + u32 LE     |
/// | larger                 | `0xFF` + u64 LE       |
///
/// Every length this crate writes for a simple transfer (scripts, signature
/// pushes, input and output counts) stays in the single-byte range.
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    if n < 0xFD {
        buf.push(n as u8);
    } else if n <= 0xFFFF {
        buf.push(0xFD);
        buf.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xFFFF_FFFF {
        buf.push(0xFE);
        buf.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        buf.push(0xFF);
        buf.extend_from_slice(&n.to_le_bytes());
    }
}

/// Append `data` prefixed with its compact-size length.
pub fn write_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    write_compact_size(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

/// Append a script data push for `data`.
///
/// Pushes up to 75 bytes use the direct length opcode, which is byte-for-byte
/// the same as a single compact-size prefix. Longer pushes switch to
/// `OP_PUSHDATA1`, `OP_PUSHDATA2` or `OP_PUSHDATA4` as script rules require.
pub fn push_data(buf: &mut Vec<u8>, data: &[u8]) {
    const OP_PUSHDATA1: u8 = 0x4C;
    const OP_PUSHDATA2: u8 = 0x4D;
    const OP_PUSHDATA4: u8 = 0x4E;

    let len = data.len();
    if len <= 0x4B {
        buf.push(len as u8);
    } else if len <= 0xFF {
        buf.push(OP_PUSHDATA1);
        buf.push(len as u8);
    } else if let Ok(len) = u16::try_from(len) {
        buf.push(OP_PUSHDATA2);
        buf.extend_from_slice(&len.to_le_bytes());
    } else {
        // Script pushes are capped at u32::MAX bytes.
        buf.push(OP_PUSHDATA4);
        buf.extend_from_slice(&(len as u32).to_le_bytes());
    }
    buf.extend_from_slice(data);
}

/// Return a reversed copy of a 32-byte hash.
///
/// Transaction hashes are displayed big-endian but serialized little-endian.
pub fn reversed(hash: &[u8; 32]) -> [u8; 32] {
    let mut out = *hash;
    out.reverse();
    out
}
