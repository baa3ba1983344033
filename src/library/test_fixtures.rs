//! Minimal audio streams the tag library accepts, for tests that go through real files.

/// Mono 16-bit 8 kHz PCM with a handful of silent samples.
pub fn wav_bytes() -> Vec<u8> {
    let data = [0u8; 16];
    let mut b = Vec::new();
    b.extend_from_slice(b"RIFF");
    b.extend_from_slice(&(4 + 8 + 16 + 8 + data.len() as u32).to_le_bytes());
    b.extend_from_slice(b"WAVE");
    b.extend_from_slice(b"fmt ");
    b.extend_from_slice(&16u32.to_le_bytes());
    b.extend_from_slice(&1u16.to_le_bytes()); // PCM
    b.extend_from_slice(&1u16.to_le_bytes()); // channels
    b.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    b.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    b.extend_from_slice(&2u16.to_le_bytes()); // block align
    b.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    b.extend_from_slice(b"data");
    b.extend_from_slice(&(data.len() as u32).to_le_bytes());
    b.extend_from_slice(&data);
    b
}

/// `fLaC` marker plus a lone STREAMINFO block: 44.1 kHz stereo 16-bit, no frames.
pub fn flac_bytes() -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(b"fLaC");
    b.push(0x80); // last metadata block, type STREAMINFO
    b.extend_from_slice(&[0x00, 0x00, 34]);
    b.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    b.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    b.extend_from_slice(&[0; 3]); // min frame size
    b.extend_from_slice(&[0; 3]); // max frame size
    // sample rate (20 bits), channels - 1 (3), bits per sample - 1 (5), total samples (36)
    let packed: u64 = (44_100 << 44) | (1 << 41) | (15 << 36);
    b.extend_from_slice(&packed.to_be_bytes());
    b.extend_from_slice(&[0; 16]); // MD5
    b
}
