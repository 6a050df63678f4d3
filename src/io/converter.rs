use super::AudioFormat;

const SCALE_I16: f32 = 32_768.0;
const SCALE_I24: f32 = 8_388_608.0;
const SCALE_I32: f64 = 2_147_483_648.0;

const I24_MIN: i32 = -(1 << 23);
const I24_MAX: i32 = (1 << 23) - 1;

/// A sample type that can sit at the edge of the graph.
///
/// The graph itself always works in `f32`; sources convert on the way in and
/// sinks convert on the way out. Fixed point conversions round to nearest and
/// clip to the representable range, so `1.0` becomes the largest positive
/// value and `-1.0` the most negative one.
pub trait Sample: Copy + Default + Send + 'static {
    const FORMAT: AudioFormat;

    fn from_f32(value: f32) -> Self;

    fn to_f32(self) -> f32;
}

impl Sample for f32 {
    const FORMAT: AudioFormat = AudioFormat::F32;

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }
}

impl Sample for i16 {
    const FORMAT: AudioFormat = AudioFormat::I16;

    #[inline]
    fn from_f32(value: f32) -> Self {
        (value * SCALE_I16)
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / SCALE_I16
    }
}

impl Sample for i32 {
    const FORMAT: AudioFormat = AudioFormat::I32;

    #[inline]
    fn from_f32(value: f32) -> Self {
        // f32 cannot hold i32::MAX, so scale in double precision.
        (value as f64 * SCALE_I32)
            .round()
            .clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        (self as f64 / SCALE_I32) as f32
    }
}

/// Packed little-endian 24-bit sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct I24(pub [u8; 3]);

impl I24 {
    pub const fn from_le_bytes(bytes: [u8; 3]) -> Self {
        I24(bytes)
    }

    pub const fn to_le_bytes(self) -> [u8; 3] {
        self.0
    }

    /// Keep the low 24 bits of `value` after clipping it to the 24-bit range.
    pub fn from_i32(value: i32) -> Self {
        let clipped = value.clamp(I24_MIN, I24_MAX);
        let [b0, b1, b2, _] = clipped.to_le_bytes();
        I24([b0, b1, b2])
    }

    pub fn to_i32(self) -> i32 {
        let [b0, b1, b2] = self.0;
        // Land the bytes in the top of the word, then shift to sign-extend.
        i32::from_le_bytes([0, b0, b1, b2]) >> 8
    }

    /// Reinterpret a packed byte stream, dropping any trailing partial sample.
    pub fn from_packed(bytes: &[u8]) -> Vec<I24> {
        bytes
            .chunks_exact(3)
            .map(|c| I24([c[0], c[1], c[2]]))
            .collect()
    }
}

impl Sample for I24 {
    const FORMAT: AudioFormat = AudioFormat::I24Packed;

    #[inline]
    fn from_f32(value: f32) -> Self {
        let scaled = (value * SCALE_I24)
            .round()
            .clamp(I24_MIN as f32, I24_MAX as f32);
        I24::from_i32(scaled as i32)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self.to_i32() as f32 / SCALE_I24
    }
}

/// Convert interleaved float samples into `dst`, stopping at the shorter slice.
pub fn convert_from_f32<S: Sample>(src: &[f32], dst: &mut [S]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = S::from_f32(s);
    }
}

/// Convert interleaved samples into floats, stopping at the shorter slice.
pub fn convert_to_f32<S: Sample>(src: &[S], dst: &mut [f32]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = s.to_f32();
    }
}
