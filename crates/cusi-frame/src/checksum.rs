use bytes::{BufMut, BytesMut};

const POLYNOMIAL: u16 = 0xA001;

/// CRC-16/Modbus: reflected polynomial 0xA001, initial value 0xFFFF.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFFu16;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Append the CRC of `dst[start..]` to `dst`, high byte first.
pub fn append_checksum(dst: &mut BytesMut, start: usize) {
    let crc = crc16(&dst[start..]);
    dst.put_u16(crc);
}
