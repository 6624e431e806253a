//! Quill ink engine.
//!
//! Turns time-stamped pointer/touch samples into stroke meshes, keeps them in
//! a scene graph, and records renderer-agnostic draw commands plus mesh
//! uploads each frame. Hosts observe the session through
//! [`host::EngineListener`].

pub mod animation;
pub mod camera;
pub mod config;
pub mod coords;
pub mod engine;
pub mod funcs;
pub mod geometry;
pub mod host;
pub mod input;
pub mod logging;
pub mod paint;
pub mod realtime;
pub mod render;
pub mod scene;
pub mod time;
