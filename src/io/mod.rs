// Purpose - sample formats at the edges of the graph, float <-> fixed point

pub mod converter;

pub use converter::{Sample, I24};

/// Sample encodings a source can read from or a sink can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioFormat {
    #[default]
    F32,
    I16,
    /// Three bytes per sample, little-endian.
    I24Packed,
    I32,
}

/// Interleaved samples in one of the supported formats.
#[derive(Debug, Clone, Copy)]
pub enum SampleSlice<'a> {
    F32(&'a [f32]),
    I16(&'a [i16]),
    I24(&'a [I24]),
    I32(&'a [i32]),
}

impl SampleSlice<'_> {
    pub fn format(&self) -> AudioFormat {
        match self {
            SampleSlice::F32(_) => AudioFormat::F32,
            SampleSlice::I16(_) => AudioFormat::I16,
            SampleSlice::I24(_) => AudioFormat::I24Packed,
            SampleSlice::I32(_) => AudioFormat::I32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleSlice::F32(s) => s.len(),
            SampleSlice::I16(s) => s.len(),
            SampleSlice::I24(s) => s.len(),
            SampleSlice::I32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable counterpart of [`SampleSlice`], the destination of a sink read.
#[derive(Debug)]
pub enum SampleSliceMut<'a> {
    F32(&'a mut [f32]),
    I16(&'a mut [i16]),
    I24(&'a mut [I24]),
    I32(&'a mut [i32]),
}

impl SampleSliceMut<'_> {
    pub fn format(&self) -> AudioFormat {
        match self {
            SampleSliceMut::F32(_) => AudioFormat::F32,
            SampleSliceMut::I16(_) => AudioFormat::I16,
            SampleSliceMut::I24(_) => AudioFormat::I24Packed,
            SampleSliceMut::I32(_) => AudioFormat::I32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SampleSliceMut::F32(s) => s.len(),
            SampleSliceMut::I16(s) => s.len(),
            SampleSliceMut::I24(s) => s.len(),
            SampleSliceMut::I32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
