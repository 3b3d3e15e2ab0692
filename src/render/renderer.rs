use std::ops::Range;

use image::{Rgb, RgbaImage};

use super::canvas::{Dot, Frame, blank, draw_dot};
use super::color::Palette;
use super::counter::{CounterStyle, counter_alpha, counter_text};
use super::layout::Placement;
use crate::midi::NoteEvent;

/// Permanent marker left behind by every note that has sounded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailStyle {
    pub radius: f64,
    pub color: Rgb<u8>,
    pub alpha: f64,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub fps: u32,
    pub fade_seconds: f64,
    pub width: u32,
    pub height: u32,
    /// Seconds of video before MIDI time 0.
    pub lead_in: f64,
    pub background: Rgb<u8>,
    pub dot_radius: f64,
    pub palette: Palette,
    pub placement: Placement,
    pub trail: Option<TrailStyle>,
    pub counter: Option<CounterStyle>,
}

impl RenderSettings {
    pub fn frame_time(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps as f64 - self.lead_in
    }

    pub fn dot(&self, note: &NoteEvent, t: f64) -> Dot {
        let (x, y) = self.placement.position(note.pitch);
        let loudness = self.palette.loudness(note.velocity);
        Dot {
            x,
            y,
            radius: self.dot_radius * (0.5 + 0.5 * loudness),
            color: self.palette.color(note.pitch, note.velocity),
            alpha: fade_fraction(t - note.onset, self.fade_seconds),
        }
    }

    fn trail_mark(&self, style: &TrailStyle, note: &NoteEvent) -> Dot {
        let (x, y) = self.placement.position(note.pitch);
        Dot {
            x,
            y,
            radius: style.radius,
            color: style.color,
            alpha: style.alpha,
        }
    }

    fn blank(&self) -> RgbaImage {
        blank(self.width, self.height, self.background)
    }
}

/// 1 at onset, 0 once the fade window has passed.
pub fn fade_fraction(age: f64, fade_seconds: f64) -> f64 {
    (1.0 - age / fade_seconds).clamp(0.0, 1.0)
}

pub fn is_visible(note: &NoteEvent, t: f64, fade_seconds: f64) -> bool {
    note.onset <= t && t < note.onset + fade_seconds
}

/// Indices of the notes with `onset <= t < onset + fade_seconds`. `notes`
/// must be sorted by onset.
pub fn visible_range(notes: &[NoteEvent], t: f64, fade_seconds: f64) -> Range<usize> {
    let start = notes.partition_point(|n| n.onset + fade_seconds <= t);
    let end = notes.partition_point(|n| n.onset <= t);
    start..end.max(start)
}

/// Number of notes with `onset <= t`, the value shown by the counter.
pub fn notes_played(notes: &[NoteEvent], t: f64) -> usize {
    notes.partition_point(|n| n.onset <= t)
}

/// Draws the counter, then the active dots in onset order.
fn draw_frame(
    mut canvas: RgbaImage,
    visible: &[NoteEvent],
    played: usize,
    settings: &RenderSettings,
    frame_index: u64,
) -> RgbaImage {
    if let Some(counter) = &settings.counter {
        let video_seconds = frame_index as f64 / settings.fps as f64;
        counter.draw(
            &mut canvas,
            &counter_text(played, counter.digits),
            counter_alpha(video_seconds, counter.fade_in),
        );
    }
    let t = settings.frame_time(frame_index);
    for note in visible {
        draw_dot(&mut canvas, &settings.dot(note, t));
    }
    canvas
}

/// Renders one frame without any state carried between calls.
pub fn render(notes: &[NoteEvent], frame_index: u64, settings: &RenderSettings) -> Frame {
    let t = settings.frame_time(frame_index);
    let visible = visible_range(notes, t, settings.fade_seconds);

    let mut canvas = settings.blank();
    if let Some(style) = &settings.trail {
        for note in &notes[..visible.end] {
            draw_dot(&mut canvas, &settings.trail_mark(style, note));
        }
    }

    Frame {
        index: frame_index,
        image: draw_frame(canvas, &notes[visible.clone()], visible.end, settings, frame_index),
    }
}

/// Frame renderer for increasing frame indices. Keeps a cursor into the
/// onset-sorted notes and, with a trail, the accumulated marker layer.
pub struct Renderer<'a> {
    notes: &'a [NoteEvent],
    settings: RenderSettings,
    start: usize,
    end: usize,
    last_time: f64,
    trail_layer: Option<RgbaImage>,
}

impl<'a> Renderer<'a> {
    pub fn new(notes: &'a [NoteEvent], settings: RenderSettings) -> Self {
        let trail_layer = settings.trail.as_ref().map(|_| settings.blank());
        Self {
            notes,
            settings,
            start: 0,
            end: 0,
            last_time: f64::NEG_INFINITY,
            trail_layer,
        }
    }

    fn rewind(&mut self) {
        self.start = 0;
        self.end = 0;
        if self.trail_layer.is_some() {
            self.trail_layer = Some(self.settings.blank());
        }
    }

    fn advance(&mut self, t: f64) {
        if t < self.last_time {
            self.rewind();
        }
        self.last_time = t;

        let fade = self.settings.fade_seconds;
        while self.end < self.notes.len() && self.notes[self.end].onset <= t {
            if let (Some(layer), Some(style)) = (&mut self.trail_layer, &self.settings.trail) {
                let mark = self.settings.trail_mark(style, &self.notes[self.end]);
                draw_dot(layer, &mark);
            }
            self.end += 1;
        }
        while self.start < self.end && self.notes[self.start].onset + fade <= t {
            self.start += 1;
        }
    }

    pub fn visible(&self) -> &'a [NoteEvent] {
        &self.notes[self.start..self.end]
    }

    /// Notes whose onset has been reached by the last rendered frame.
    pub fn played(&self) -> usize {
        self.end
    }

    pub fn render(&mut self, frame_index: u64) -> Frame {
        let t = self.settings.frame_time(frame_index);
        self.advance(t);
        let canvas = match &self.trail_layer {
            Some(layer) => layer.clone(),
            None => self.settings.blank(),
        };
        Frame {
            index: frame_index,
            image: draw_frame(canvas, self.visible(), self.end, &self.settings, frame_index),
        }
    }
}
