//! Annotation and view-sync engine for the live-video viewer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! annotation layer drawn over the host's feed: translating pointer input into
//! store mutations, keeping the pan/zoom transform, hit-testing markers and
//! strokes, gating admin commands, and applying room events from the relay.
//! The host JavaScript layer only wires DOM events and the room socket to the
//! engine and carries out the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Ordered annotation store |
//! | [`camera`] | Pan/zoom transform and coordinate conversions |
//! | [`input`] | Tools, buttons, and the gesture state machine |
//! | [`hit`] | Marker and stroke hit-testing |
//! | [`scene`] | Display list built from the store |
//! | [`render`] | Draws a scene to the 2D context |
//! | [`authority`] | Admin gate and admin command builders |
//! | [`sync`] | Inbound room events and outbound view-sync throttle |
//! | [`config`] | Viewer configuration from the host page |
//! | [`bindings`] | `wasm_bindgen` facade |
//! | [`consts`] | Shared numeric constants (zoom limits, hit radii, etc.) |

pub mod authority;
pub mod bindings;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;
pub mod sync;

pub use events;
