#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;

/// Multiplies its input by a gain that moves linearly to each new target
/// over `length_in_frames`.
///
/// The first target set before any processing applies at once, so a stream
/// can start at a chosen volume without fading in.
pub struct RampLinear {
    samples_per_frame: usize,
    target: f32,
    level_from: f32,
    level_to: f32,
    scaler: f32,
    remaining: usize,
    length_in_frames: usize,
    has_processed: bool,
    #[cfg(feature = "rtrb")]
    rx: Option<Consumer<f32>>,
}

#[cfg(feature = "rtrb")]
const RAMP_QUEUE_SIZE: usize = 64;

impl RampLinear {
    pub fn new(samples_per_frame: usize) -> Self {
        Self {
            samples_per_frame,
            target: 1.0,
            level_from: 1.0,
            level_to: 1.0,
            scaler: 0.0,
            remaining: 0,
            length_in_frames: 0,
            has_processed: false,
            #[cfg(feature = "rtrb")]
            rx: None,
        }
    }

    /// A ramp whose target is driven from another thread through the
    /// returned handle.
    #[cfg(feature = "rtrb")]
    pub fn with_handle(samples_per_frame: usize) -> (Self, RampHandle) {
        let (tx, rx) = RingBuffer::<f32>::new(RAMP_QUEUE_SIZE);
        let mut ramp = Self::new(samples_per_frame);
        ramp.rx = Some(rx);
        (ramp, RampHandle { tx })
    }

    pub fn set_length_in_frames(&mut self, frames: usize) {
        self.length_in_frames = frames;
    }

    pub fn length_in_frames(&self) -> usize {
        self.length_in_frames
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        if !self.has_processed {
            self.force_current(target);
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump straight to `level`, abandoning any ramp in progress.
    pub fn force_current(&mut self, level: f32) {
        self.level_from = level;
        self.level_to = level;
        self.remaining = 0;
    }

    #[inline]
    fn current_level(&self) -> f32 {
        self.level_to - self.remaining as f32 * self.scaler
    }

    #[cfg(feature = "rtrb")]
    fn drain_messages(&mut self) {
        let mut latest = None;
        if let Some(rx) = self.rx.as_mut() {
            while let Ok(target) = rx.pop() {
                latest = Some(target);
            }
        }
        if let Some(target) = latest {
            self.set_target(target);
        }
    }
}

impl FlowNode for RampLinear {
    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input(self.samples_per_frame)
            .output(self.samples_per_frame)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        #[cfg(feature = "rtrb")]
        self.drain_messages();
        self.has_processed = true;

        if self.target != self.level_to {
            // Start the new ramp from wherever the old one had got to.
            self.level_from = self.current_level();
            self.level_to = self.target;
            self.remaining = self.length_in_frames;
            self.scaler = if self.length_in_frames > 0 {
                (self.level_to - self.level_from) / self.length_in_frames as f32
            } else {
                0.0
            };
        }

        let channels = self.samples_per_frame;
        let ramp_frames = num_frames.min(self.remaining);
        let (input, output) = ctx.io(0, 0);
        let mut frames = output[..num_frames * channels]
            .chunks_exact_mut(channels)
            .zip(input.chunks_exact(channels));

        for (out, inp) in (&mut frames).take(ramp_frames) {
            let level = self.current_level();
            for (o, &i) in out.iter_mut().zip(inp) {
                *o = i * level;
            }
            self.remaining -= 1;
        }
        let level = self.level_to;
        for (out, inp) in frames {
            for (o, &i) in out.iter_mut().zip(inp) {
                *o = i * level;
            }
        }
        num_frames
    }

    fn reset(&mut self) {
        self.has_processed = false;
        self.force_current(self.target);
    }

    fn name(&self) -> &'static str {
        "ramp_linear"
    }
}

/// Control-thread side of a [`RampLinear`] built with
/// [`RampLinear::with_handle`].
#[cfg(feature = "rtrb")]
pub struct RampHandle {
    tx: Producer<f32>,
}

#[cfg(feature = "rtrb")]
impl RampHandle {
    /// Queue a new target. Dropped silently if the queue is full; only the
    /// newest queued target is used anyway.
    pub fn set_target(&mut self, target: f32) {
        let _ = self.tx.push(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FlowGraph, SinkFloat};

    #[test]
    fn test_zero_length_ramp_jumps() {
        let mut graph = FlowGraph::new();
        let ramp = graph.add(RampLinear::new(1));
        let sink = graph.add(SinkFloat::new(1));
        graph.set_input_value(ramp.input(0), 2.0);
        graph.connect(ramp.output(0), sink.input(0));

        let mut out = [0.0f32; 4];
        graph.read(sink, 0, &mut out, 4);
        assert_eq!(out, [2.0; 4]);

        graph.node_mut(ramp).set_target(0.5);
        graph.read(sink, 4, &mut out, 4);
        assert_eq!(out, [1.0; 4]);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_handle_retargets_from_another_thread() {
        let (node, mut handle) = RampLinear::with_handle(1);
        let mut graph = FlowGraph::new();
        let ramp = graph.add(node);
        let sink = graph.add(SinkFloat::new(1));
        graph.set_input_value(ramp.input(0), 1.0);
        graph.connect(ramp.output(0), sink.input(0));
        graph.node_mut(ramp).set_length_in_frames(4);

        let mut out = [0.0f32; 8];
        graph.read(sink, 0, &mut out, 8);
        assert_eq!(out, [1.0; 8]);

        std::thread::spawn(move || handle.set_target(0.0))
            .join()
            .unwrap();

        graph.read(sink, 8, &mut out, 8);
        assert_eq!(&out[..4], &[1.0, 0.75, 0.5, 0.25]);
        assert_eq!(&out[4..], &[0.0; 4]);
    }
}
