use std::path::PathBuf;

use dotfade::error::EncodeError;
use dotfade::midi::NoteStats;
use dotfade::render::visible_range;
use dotfade::{
    Config, Encoder, EncoderConfig, Frame, Layout, TrackSelector, TrailConfig, extract_from_bytes,
    render, render_to,
};
use image::Rgba;
use midly::num::{u4, u7, u15, u28};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};

fn key(delta: u32, pitch: u8, vel: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: midly::MidiMessage::NoteOn {
                key: u7::new(pitch),
                vel: u7::new(vel),
            },
        },
    }
}

/// Single track file at 480 ticks per beat and the default 120 bpm.
fn midi_file(mut events: Vec<TrackEvent<'static>>) -> Vec<u8> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(480)),
    ));
    events.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(events);
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();
    bytes
}

/// C4 at 0s and C5 at 1s, half a second each.
fn two_notes() -> Vec<u8> {
    midi_file(vec![
        key(0, 60, 100),
        key(480, 60, 0),
        key(480, 72, 60),
        key(480, 72, 0),
    ])
}

/// C4 at 0s for half a second, then C5 at 1s that is never released.
fn unreleased_last_note() -> Vec<u8> {
    midi_file(vec![key(0, 60, 100), key(480, 60, 0), key(480, 72, 60)])
}

fn config() -> Config {
    Config {
        fps: 10,
        fade_seconds: 1.0,
        width: 64,
        height: 32,
        ..Config::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dotfade-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[derive(Default)]
struct Recorder {
    size: Option<(u32, u32, u32)>,
    frames: Vec<Frame>,
    finished: bool,
}

impl Encoder for Recorder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> Result<(), EncodeError> {
        self.size = Some((width, height, fps));
        Ok(())
    }

    fn push(&mut self, frame: &Frame) -> Result<(), EncodeError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EncodeError> {
        self.finished = true;
        Ok(())
    }
}

#[test]
fn extracts_both_notes() {
    let notes = extract_from_bytes(&two_notes(), &TrackSelector::Index(0), None).unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!((notes[0].pitch, notes[0].velocity), (60, 100));
    assert_eq!((notes[0].onset, notes[0].duration), (0.0, 0.5));
    assert_eq!((notes[1].pitch, notes[1].velocity), (72, 60));
    assert_eq!((notes[1].onset, notes[1].duration), (1.0, 0.5));
}

#[test]
fn one_dot_at_a_time_then_nothing() {
    let notes = extract_from_bytes(&two_notes(), &TrackSelector::Index(0), None).unwrap();
    let config = config();
    let frames = config.frame_count(&NoteStats::from_notes(&notes));
    assert_eq!(frames, 20);

    for index in 0..frames + 10 {
        let t = index as f64 / 10.0;
        let visible: Vec<u8> = notes[visible_range(&notes, t, 1.0)]
            .iter()
            .map(|n| n.pitch)
            .collect();
        match index {
            0..10 => assert_eq!(visible, [60], "frame {}", index),
            10..20 => assert_eq!(visible, [72], "frame {}", index),
            _ => assert!(visible.is_empty(), "frame {}", index),
        }
    }
}

#[test]
fn streams_every_frame_in_order() {
    let notes = extract_from_bytes(&two_notes(), &TrackSelector::Index(0), None).unwrap();
    let config = Config {
        tail: 0.5,
        ..config()
    };
    let stats = NoteStats::from_notes(&notes);
    let frames = config.frame_count(&stats);

    let mut recorder = Recorder::default();
    let settings = config.render_settings(&stats).unwrap();
    render_to(&notes, settings, frames, &mut recorder).unwrap();

    assert_eq!(recorder.size, Some((64, 32, 10)));
    assert!(recorder.finished);
    assert_eq!(recorder.frames.len(), 25);
    for (i, frame) in recorder.frames.iter().enumerate() {
        assert_eq!(frame.index, i as u64);
    }

    let background = Rgba([0, 0, 0, 255]);
    assert!(recorder.frames[0].image.pixels().any(|p| *p != background));
    assert!(recorder.frames[24].image.pixels().all(|p| *p == background));
}

#[test]
fn rendering_is_deterministic() {
    let notes = extract_from_bytes(&two_notes(), &TrackSelector::Index(0), None).unwrap();
    let config = Config {
        layout: Layout::Scatter { seed: 3 },
        trail: Some(TrailConfig::default()),
        ..config()
    };
    let stats = NoteStats::from_notes(&notes);
    let frames = config.frame_count(&stats);

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    let settings = config.render_settings(&stats).unwrap();
    render_to(&notes, settings.clone(), frames, &mut first).unwrap();
    render_to(&notes, settings.clone(), frames, &mut second).unwrap();
    assert_eq!(first.frames, second.frames);

    for frame in &first.frames {
        assert_eq!(*frame, render(&notes, frame.index, &settings));
    }
}

#[test]
fn writes_png_sequence() {
    let dir = scratch_dir("pngs");
    let input = dir.join("two_notes.mid");
    std::fs::write(&input, two_notes()).unwrap();
    let output = dir.join("frames");

    let config = Config {
        input,
        output: output.clone(),
        encoder: EncoderConfig::PngSequence,
        ..config()
    };
    let summary = dotfade::run(&config).unwrap();
    assert_eq!(summary.notes, 2);
    assert_eq!(summary.frames, 20);
    assert_eq!(summary.seconds, 2.0);

    assert!(output.join("frame_000000.png").is_file());
    assert!(output.join("frame_000019.png").is_file());
    assert!(!output.join("frame_000020.png").exists());
    let last = image::open(output.join("frame_000019.png")).unwrap().to_rgba8();
    assert_eq!(last.dimensions(), (64, 32));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_config_renders_nothing() {
    let dir = scratch_dir("invalid");
    let input = dir.join("two_notes.mid");
    std::fs::write(&input, two_notes()).unwrap();
    let output = dir.join("frames");

    let config = Config {
        input,
        output: output.clone(),
        fps: 0,
        encoder: EncoderConfig::PngSequence,
        ..config()
    };
    assert!(matches!(
        dotfade::run(&config),
        Err(dotfade::Error::Config(_))
    ));
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_a_parse_error() {
    let config = Config {
        input: PathBuf::from("/nonexistent/dotfade/input.mid"),
        encoder: EncoderConfig::PngSequence,
        ..config()
    };
    assert!(matches!(
        dotfade::run(&config),
        Err(dotfade::Error::Parse(_))
    ));
}

#[test]
fn inspect_reports_ranges() {
    let dir = scratch_dir("inspect");
    let input = dir.join("two_notes.mid");
    std::fs::write(&input, two_notes()).unwrap();

    let report = dotfade::inspect(&Config {
        input,
        ..Config::default()
    })
    .unwrap();
    assert_eq!(report.stats.count, 2);
    assert_eq!(report.stats.pitch_range, (60, 72));
    assert_eq!(report.stats.end_time, 1.5);

    let text = report.to_string();
    assert!(text.contains("Note count: 2"));
    assert!(text.contains("C4"));
    assert!(text.contains("C5"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn default_padding_shows_unreleased_last_note() {
    let notes =
        extract_from_bytes(&unreleased_last_note(), &TrackSelector::Index(0), None).unwrap();
    assert_eq!((notes[1].onset, notes[1].duration), (1.0, 0.0));

    let config = Config {
        fps: 10,
        fade_seconds: 1.0,
        width: 64,
        height: 32,
        ..Config::default()
    };
    let stats = NoteStats::from_notes(&notes);
    let frames = config.frame_count(&stats);
    assert_eq!(frames, 20);

    let mut recorder = Recorder::default();
    let settings = config.render_settings(&stats).unwrap();
    render_to(&notes, settings.clone(), frames, &mut recorder).unwrap();

    let showing_last: Vec<u64> = recorder
        .frames
        .iter()
        .filter(|frame| {
            let t = settings.frame_time(frame.index);
            visible_range(&notes, t, 1.0).contains(&1)
        })
        .map(|frame| frame.index)
        .collect();
    assert_eq!(showing_last, (10..20).collect::<Vec<u64>>());

    // C4 has faded by 1s, so only C5 is on screen
    let background = Rgba([0, 0, 0, 255]);
    assert!(recorder.frames[10].image.pixels().any(|p| *p != background));
    assert!(recorder.frames[19].image.pixels().any(|p| *p != background));
}

#[test]
fn zero_length_piece_renders_its_note() {
    let dir = scratch_dir("instant");
    let input = dir.join("instant.mid");
    std::fs::write(&input, midi_file(vec![key(0, 64, 90), key(0, 64, 0)])).unwrap();
    let output = dir.join("frames");

    let config = Config {
        input,
        output: output.clone(),
        encoder: EncoderConfig::PngSequence,
        ..config()
    };
    let summary = dotfade::run(&config).unwrap();
    assert_eq!(summary.notes, 1);
    assert_eq!(summary.frames, 10);

    let first = image::open(output.join("frame_000000.png")).unwrap().to_rgba8();
    assert!(first.pixels().any(|p| *p != Rgba([0, 0, 0, 255])));
    assert!(output.join("frame_000009.png").is_file());

    std::fs::remove_dir_all(&dir).unwrap();
}
