//! Serialized input streams for playback and fixtures.
//!
//! The record layout mirrors the wire format hosts record input in: one flat
//! record per sample, plus the screen parameters the recording was made with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::coords::Vec2;

use super::synth::{SCREEN_HEIGHT, SCREEN_PPI, SCREEN_WIDTH};
use super::types::{sort_stream, Flags, InputType, SInput};

/// Device type as written in streams.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    Touch,
    Mouse,
    Pen,
    Wheel,
}

impl From<InputType> for RecordType {
    fn from(t: InputType) -> Self {
        match t {
            InputType::Touch => RecordType::Touch,
            InputType::Mouse => RecordType::Mouse,
            InputType::Pen => RecordType::Pen,
            InputType::Wheel => RecordType::Wheel,
        }
    }
}

impl From<RecordType> for InputType {
    fn from(t: RecordType) -> Self {
        match t {
            RecordType::Touch => InputType::Touch,
            RecordType::Mouse => InputType::Mouse,
            RecordType::Pen => InputType::Pen,
            RecordType::Wheel => InputType::Wheel,
        }
    }
}

/// One serialized input sample.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SInputRecord {
    #[serde(rename = "type")]
    pub input_type: RecordType,
    pub id: u32,
    pub flags: u32,
    pub time_s: f64,
    pub screen_pos_x: f64,
    pub screen_pos_y: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub wheel_delta_x: f64,
    #[serde(default)]
    pub wheel_delta_y: f64,
    #[serde(default)]
    pub tilt: f64,
    #[serde(default)]
    pub orientation: f64,
}

impl From<&SInput> for SInputRecord {
    fn from(i: &SInput) -> Self {
        Self {
            input_type: i.input_type.into(),
            id: i.id,
            flags: i.flags.bits(),
            time_s: i.time_s,
            screen_pos_x: i.screen_pos.x as f64,
            screen_pos_y: i.screen_pos.y as f64,
            pressure: i.pressure as f64,
            wheel_delta_x: i.wheel_delta.x as f64,
            wheel_delta_y: i.wheel_delta.y as f64,
            tilt: i.tilt as f64,
            orientation: i.orientation as f64,
        }
    }
}

impl From<&SInputRecord> for SInput {
    fn from(r: &SInputRecord) -> Self {
        Self {
            input_type: r.input_type.into(),
            id: r.id,
            flags: Flags(r.flags),
            time_s: r.time_s,
            screen_pos: Vec2::new(r.screen_pos_x as f32, r.screen_pos_y as f32),
            pressure: r.pressure as f32,
            wheel_delta: Vec2::new(r.wheel_delta_x as f32, r.wheel_delta_y as f32),
            tilt: r.tilt as f32,
            orientation: r.orientation as f32,
        }
    }
}

/// Builds a record with every field given explicitly.
#[allow(clippy::too_many_arguments)]
pub fn input_record(
    input_type: RecordType,
    id: u32,
    flags: u32,
    time_s: f64,
    screen_pos_x: f64,
    screen_pos_y: f64,
    pressure: f64,
    wheel_delta_x: f64,
    wheel_delta_y: f64,
    tilt: f64,
    orientation: f64,
) -> SInputRecord {
    SInputRecord {
        input_type,
        id,
        flags,
        time_s,
        screen_pos_x,
        screen_pos_y,
        pressure,
        wheel_delta_x,
        wheel_delta_y,
        tilt,
        orientation,
    }
}

/// Ordered list of input records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SInputStream {
    pub inputs: Vec<SInputRecord>,
}

impl SInputStream {
    pub fn from_records(records: &[SInputRecord]) -> Self {
        Self { inputs: records.to_vec() }
    }

    pub fn from_inputs(inputs: &[SInput]) -> Self {
        Self { inputs: inputs.iter().map(SInputRecord::from).collect() }
    }

    /// Decodes the records into samples in stream order.
    pub fn to_inputs(&self) -> Vec<SInput> {
        let mut out: Vec<SInput> = self.inputs.iter().map(SInput::from).collect();
        sort_stream(&mut out);
        out
    }
}

/// Screen parameters a stream was recorded against.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenParams {
    pub width: u32,
    pub height: u32,
    pub ppi: f32,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            ppi: SCREEN_PPI,
        }
    }
}

/// Input stream plus the initial camera/screen setup needed to replay it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStream {
    pub initial_camera: ScreenParams,
    pub input_stream: SInputStream,
}

impl PlaybackStream {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize playback stream")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let stream: PlaybackStream =
            serde_json::from_str(json).context("failed to parse playback stream")?;
        anyhow::ensure!(
            stream.initial_camera.width > 0 && stream.initial_camera.height > 0,
            "playback stream has zero-sized screen ({}x{})",
            stream.initial_camera.width,
            stream.initial_camera.height
        );
        Ok(stream)
    }
}

/// Wraps records in a playback stream using the standard fixture screen.
pub fn make_playback_stream(records: &[SInputRecord]) -> PlaybackStream {
    PlaybackStream {
        initial_camera: ScreenParams::default(),
        input_stream: SInputStream::from_records(records),
    }
}
