//! An interactive editor for the dimensions of a single box.
//!
//! The box is centered at the origin and carries a small handle on each
//! enabled face. Picking a handle attaches a translation gizmo restricted to
//! the handle's axis; dragging it resizes the box symmetrically. Every change
//! throws the derived scene away and builds it again from [`BoxParams`].
//!
//! # Usage
//!
//! This crate does no rendering of its own. Feed pointer and resize events
//! to an [`Editor`] in viewport coordinates, then draw
//! [`Editor::scene`] with [`Editor::camera`] and the gizmo from
//! [`AxisGizmo::draw`] or [`AxisGizmo::arrows`].
//!
//! If you are using [Bevy](https://bevyengine.org/) or
//! [Egui](https://github.com/emilk/egui), use `box-editor-bevy` or
//! `box-editor-egui` instead.

mod shape;

pub mod camera;
pub mod config;
pub mod editor;
pub mod face;
pub mod gizmo;
pub mod label;
pub mod material;
pub mod math;
pub mod params;
pub mod picking;
pub mod resource;
pub mod scene;

pub mod prelude;

pub use prelude::*;
