// src/lib.rs
//! Native host for the hero particle field.
//!
//! Probes the wgpu adapter, drives a [`hero_field::HeroShell`] once per redraw
//! and draws the field and floating shapes as instanced sprites, with an egui
//! HUD on top. When no 3D scene is available the static backdrop is painted
//! through egui instead.

pub mod app;
pub mod camera;
pub mod data;
pub mod host;
pub mod renderer;
pub mod settings;
pub mod ui;
