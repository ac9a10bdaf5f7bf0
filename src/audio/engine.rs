//! Synthesis graph: lead + bass voices through a shared
//! filter -> delay -> reverb chain, sequenced by the transport.

use super::dsp::{Effect, FeedbackDelay, Lfo, LowPassFilter, Reverb};
use super::transport::{ScheduledNote, Transport};
use super::voice::Voice;
use crate::music::{Composition, PatternKind};
use crate::params::{
    audio_constants::{BLOCK_SIZE, CONTROL_RATE_DIVISOR},
    AudioConfig,
};

/// Live DSP objects for one loaded composition
struct Graph {
    lead: Voice,
    bass: Voice,
    filter: LowPassFilter,
    lfo: Lfo,
    delay: FeedbackDelay,
    reverb: Reverb,
    /// Samples until the next LFO -> cutoff update
    control_countdown: usize,
}

impl Graph {
    fn build(composition: &Composition, config: &AudioConfig, sample_rate: f32) -> Self {
        let fx = &composition.effects;
        Self {
            lead: Voice::new(
                &composition.lead,
                config.lead_polyphony,
                config.lead_gain,
                sample_rate,
            ),
            bass: Voice::new(&composition.bass, 1, config.bass_gain, sample_rate),
            filter: LowPassFilter::new(
                fx.filter.cutoff_hz as f32,
                fx.filter.q as f32,
                sample_rate,
            ),
            lfo: Lfo::new(
                fx.lfo.rate_hz as f32,
                fx.lfo.min_hz as f32,
                fx.lfo.max_hz as f32,
            ),
            delay: FeedbackDelay::new(
                fx.delay.time_s as f32,
                fx.delay.feedback as f32,
                fx.delay.wet as f32,
                sample_rate,
            ),
            reverb: Reverb::new(fx.reverb.decay_s as f32, fx.reverb.wet as f32, sample_rate),
            control_countdown: 0,
        }
    }

    fn trigger(&mut self, note: &ScheduledNote) {
        let voice = match note.kind {
            PatternKind::Arpeggio => &mut self.lead,
            PatternKind::Bass => &mut self.bass,
        };
        voice.trigger_attack_release(note.freq_hz, note.duration_s, note.velocity);
    }

    #[inline]
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        // LFO drives the cutoff directly, at control rate
        if self.control_countdown == 0 {
            let cutoff = self.lfo.advance(CONTROL_RATE_DIVISOR, sample_rate);
            self.filter.set_cutoff(cutoff);
            self.control_countdown = CONTROL_RATE_DIVISOR;
        }
        self.control_countdown -= 1;

        let dry = self.lead.next_sample() + self.bass.next_sample();
        let filtered = self.filter.process(dry);
        let echoed = self.delay.process(filtered);
        self.reverb.process(echoed)
    }
}

/// Offline-capable audio engine; the real-time stream and the offline
/// renderer both pull samples from it.
pub struct Engine {
    config: AudioConfig,
    sample_rate: f32,
    graph: Option<Graph>,
    transport: Transport,
    scheduled: Vec<ScheduledNote>,
    mono: Vec<f32>,
}

impl Engine {
    pub fn new(config: AudioConfig, sample_rate: f32) -> Self {
        Self {
            config,
            sample_rate,
            graph: None,
            transport: Transport::default(),
            scheduled: Vec::with_capacity(32),
            mono: vec![0.0; BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Build voices, effects and parts for `composition`, replacing any previous graph
    pub fn load(&mut self, composition: &Composition) {
        self.transport.stop();
        self.transport.clear_parts();
        self.transport.set_bpm(composition.tempo_bpm);
        self.transport.add_part(composition.arpeggio.clone());
        self.transport.add_part(composition.bass_line.clone());
        self.graph = Some(Graph::build(composition, &self.config, self.sample_rate));
        log::debug!(
            "Engine loaded: {} parts at {} BPM, {} Hz",
            self.transport.part_count(),
            composition.tempo_bpm,
            self.sample_rate
        );
    }

    /// Drop the graph and all parts
    pub fn unload(&mut self) {
        self.transport.stop();
        self.transport.clear_parts();
        self.scheduled.clear();
        self.graph = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.graph.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    /// Rewind and start both parts from time zero
    pub fn start(&mut self) {
        if self.graph.is_none() {
            log::warn!("Engine start requested with nothing loaded");
            return;
        }
        self.transport.start_from_zero();
    }

    /// Halt the transport; scheduled notes are discarded, sounding ones released
    pub fn stop(&mut self) {
        self.transport.stop();
        self.scheduled.clear();
        if let Some(graph) = &mut self.graph {
            graph.lead.release_all();
            graph.bass.release_all();
        }
    }

    /// Notes currently sounding on both voices (including release tails)
    pub fn active_notes(&self) -> usize {
        self.graph
            .as_ref()
            .map_or(0, |g| g.lead.active_notes() + g.bass.active_notes())
    }

    /// Notes triggered on both voices since the graph was loaded
    pub fn trigger_count(&self) -> u64 {
        self.graph
            .as_ref()
            .map_or(0, |g| g.lead.trigger_count() + g.bass.trigger_count())
    }

    /// Render mono samples into `out`
    pub fn render_mono(&mut self, out: &mut [f32]) {
        for block in out.chunks_mut(BLOCK_SIZE) {
            self.render_block(block);
        }
    }

    /// Render interleaved frames (mono copied to every channel), hard-clipped
    /// to the configured output limit
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let limit = self.config.output_limit;
        let mut mono = std::mem::take(&mut self.mono);

        for frames in out.chunks_mut(BLOCK_SIZE * channels) {
            let frame_count = frames.len() / channels;
            let block = &mut mono[..frame_count];
            self.render_block(block);

            for (frame, &sample) in frames.chunks_mut(channels).zip(block.iter()) {
                let clipped = sample.clamp(-limit, limit);
                frame.iter_mut().for_each(|s| *s = clipped);
            }
        }

        self.mono = mono;
    }

    fn render_block(&mut self, block: &mut [f32]) {
        let Some(graph) = &mut self.graph else {
            block.fill(0.0);
            return;
        };

        self.transport
            .advance(block.len(), self.sample_rate, &mut self.scheduled);

        let mut pending = self.scheduled.iter().peekable();
        for (i, sample) in block.iter_mut().enumerate() {
            while let Some(note) = pending.next_if(|n| n.offset <= i) {
                graph.trigger(note);
            }
            *sample = graph.next_sample(self.sample_rate);
        }
    }
}
