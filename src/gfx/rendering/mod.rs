//! Rendering pipeline: engine, pipelines, backdrop layer and readback
//! plumbing for PNG export.

pub mod backdrop;
pub mod pipeline_manager;
pub mod render_engine;

pub use backdrop::BackdropLayer;
pub use render_engine::RenderEngine;

/// Row alignment required by `copy_texture_to_buffer`
const ROW_ALIGNMENT: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Tightly packed RGBA pixels read back from an offscreen render
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Failure during offscreen readback
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("device poll failed during readback: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("failed to map the readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("readback channel closed before the buffer was mapped")]
    ChannelClosed,
}

/// Bytes per padded row for an RGBA texture copy of the given width
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    unpadded.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
}

/// Strips the per-row copy padding, producing tightly packed RGBA data
pub(crate) fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * padded_bytes_per_row as usize;
        packed.extend_from_slice(&data[start..start + row_bytes]);
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_bytes_per_row_alignment() {
        // 64 pixels * 4 bytes = 256, already aligned.
        assert_eq!(padded_bytes_per_row(64), 256);
        // 100 pixels * 4 bytes = 400, padded up to the next multiple of 256.
        assert_eq!(padded_bytes_per_row(100), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn test_unpad_rows_strips_padding() {
        let width = 2u32;
        let height = 2u32;
        let padded = padded_bytes_per_row(width);
        let mut data = vec![0u8; (padded * height) as usize];
        // First 8 bytes of each row are the real pixels.
        for row in 0..height {
            for byte in 0..8 {
                data[(row * padded + byte) as usize] = (row * 8 + byte) as u8;
            }
        }

        let packed = unpad_rows(&data, width, height, padded);
        assert_eq!(packed.len(), 16);
        assert_eq!(&packed[..8], &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(&packed[8..], &[8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_unpad_rows_identity_when_aligned() {
        let width = 64u32;
        let padded = padded_bytes_per_row(width);
        assert_eq!(padded, width * 4);
        let data: Vec<u8> = (0..padded).map(|i| (i % 251) as u8).collect();
        assert_eq!(unpad_rows(&data, width, 1, padded), data);
    }
}
