//! Feature extraction for ML inference
//!
//! Samples three fixed-size windows from a byte source (beginning, middle and
//! end) and concatenates them into the model's fixed-shape input. Offsets and
//! padding must match the layout the model was trained on exactly.

use crate::config::SamplingConfig;
use crate::error::Result;
use crate::models::{FeatureVector, Windows};
use crate::source::ByteSource;

/// Extracts fingerprint windows from byte sources
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: SamplingConfig,
}

impl FeatureExtractor {
    pub fn new(config: SamplingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Build the model input for a non-empty source
    pub fn extract<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<FeatureVector> {
        let windows = self.sample(source)?;
        Ok(FeatureVector::from_windows(&windows))
    }

    /// Read the beginning, middle and end windows
    pub fn sample<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Windows> {
        let len = source.len();
        Ok(Windows {
            beginning: self.beginning_window(source, len)?,
            middle: self.middle_window(source, len)?,
            end: self.end_window(source, len)?,
        })
    }

    /// First bytes, left-aligned, padding in the trailing positions
    fn beginning_window<S: ByteSource + ?Sized>(&self, source: &mut S, len: u64) -> Result<Vec<u8>> {
        let size = self.config.beginning_size;
        let mut window = vec![self.config.padding_token; size];
        let take = clamp_to(size, len);
        if take > 0 {
            source.read_at(0, &mut window[..take])?;
        }
        Ok(window)
    }

    /// Bytes read from around the centre, padding in the trailing positions
    fn middle_window<S: ByteSource + ?Sized>(&self, source: &mut S, len: u64) -> Result<Vec<u8>> {
        let size = self.config.mid_size;
        let mut window = vec![self.config.padding_token; size];
        if size == 0 {
            return Ok(window);
        }
        let offset = middle_offset(len, size);
        let take = clamp_to(size, len - offset);
        if take > 0 {
            source.read_at(offset, &mut window[..take])?;
        }
        Ok(window)
    }

    /// Last bytes, right-aligned, padding in the leading positions
    fn end_window<S: ByteSource + ?Sized>(&self, source: &mut S, len: u64) -> Result<Vec<u8>> {
        let size = self.config.end_size;
        let mut window = vec![self.config.padding_token; size];
        let take = clamp_to(size, len);
        if take > 0 {
            source.read_at(len - take as u64, &mut window[size - take..])?;
        }
        Ok(window)
    }
}

/// Start of the middle window: half the length rounded half up, minus half
/// the window, clamped at zero
pub fn middle_offset(len: u64, mid_size: usize) -> u64 {
    let half_len = len / 2 + len % 2;
    half_len.saturating_sub((mid_size / 2) as u64)
}

/// `min(size, available)` without truncating large lengths
fn clamp_to(size: usize, available: u64) -> usize {
    usize::try_from(available).map_or(size, |a| a.min(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn config(beg: usize, mid: usize, end: usize, pad: u8) -> SamplingConfig {
        SamplingConfig {
            beginning_size: beg,
            mid_size: mid,
            end_size: end,
            padding_token: pad,
            min_size_for_model: 0,
        }
    }

    fn extract(cfg: SamplingConfig, data: &[u8]) -> Vec<i32> {
        FeatureExtractor::new(cfg)
            .extract(&mut MemorySource::new(data))
            .unwrap()
            .into_inner()
    }

    #[test]
    fn test_known_sequence() {
        let values = extract(config(2, 2, 2, 0), &[10, 20, 30, 40, 50]);
        assert_eq!(values, vec![10, 20, 30, 40, 40, 50]);
    }

    #[test]
    fn test_middle_offset_rounds_half_up() {
        assert_eq!(middle_offset(5, 2), 2);
        assert_eq!(middle_offset(4, 2), 1);
        assert_eq!(middle_offset(1, 0), 1);
        assert_eq!(middle_offset(3, 10), 0);
        assert_eq!(middle_offset(1001, 3), 500);
    }

    #[test]
    fn test_fixed_output_length() {
        let sizes = [(0, 0, 0), (1, 0, 1), (4, 3, 2), (16, 16, 16), (0, 7, 0), (5, 0, 0)];
        for &(beg, mid, end) in &sizes {
            for len in 1..40usize {
                let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
                let values = extract(config(beg, mid, end, 0xaa), &data);
                assert_eq!(values.len(), beg + mid + end, "sizes {:?} len {}", (beg, mid, end), len);
            }
        }
    }

    #[test]
    fn test_beginning_padding() {
        let values = extract(config(6, 0, 0, 7), &[1, 2, 3]);
        assert_eq!(values, vec![1, 2, 3, 7, 7, 7]);
    }

    #[test]
    fn test_end_padding_is_leading() {
        let values = extract(config(0, 0, 6, 7), &[1, 2, 3]);
        assert_eq!(values, vec![7, 7, 7, 1, 2, 3]);
    }

    #[test]
    fn test_middle_padding_is_trailing() {
        // offset = max(0, round(3/2) - 5/2) = 0, three real bytes then padding
        let values = extract(config(0, 5, 0, 9), &[1, 2, 3]);
        assert_eq!(values, vec![1, 2, 3, 9, 9]);

        // offset = round(5/2) - 5/2 = 1, read stops at end of source
        let values = extract(config(0, 5, 0, 9), &[1, 2, 3, 4, 5]);
        assert_eq!(values, vec![2, 3, 4, 5, 9]);
    }

    #[test]
    fn test_last_byte_is_last_feature() {
        for len in 1..64usize {
            let data: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8 + 1).collect();
            for end in 1..8 {
                let values = extract(config(3, 2, end, 0), &data);
                assert_eq!(*values.last().unwrap(), i32::from(*data.last().unwrap()));
            }
        }
    }

    #[test]
    fn test_windows_are_separate() {
        let data: Vec<u8> = (0..=99).collect();
        let windows = FeatureExtractor::new(config(3, 4, 3, 0))
            .sample(&mut MemorySource::new(&data))
            .unwrap();
        assert_eq!(windows.beginning, vec![0, 1, 2]);
        assert_eq!(windows.middle, vec![48, 49, 50, 51]);
        assert_eq!(windows.end, vec![97, 98, 99]);
    }

    #[test]
    fn test_high_bytes_widen_unsigned() {
        let values = extract(config(2, 0, 1, 0), &[0xff, 0xfe, 0x80]);
        assert_eq!(values, vec![255, 254, 128]);
    }
}
