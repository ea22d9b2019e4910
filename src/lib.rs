//! Cylindrical map projection engine.
//!
//! Converts geographic line strings and rings into screen polygons for
//! equirectangular, Mercator and Miller maps, taking care of what makes a
//! wrapping sphere awkward on a flat canvas:
//!
//! - **Antimeridian**: paths crossing the seam opposite the view center are
//!   split instead of drawn as a stroke across the whole map
//! - **Poles**: rings running around a pole are capped at the map edge
//! - **Repetition**: a globe narrower than the canvas is tiled horizontally
//!
//! The entry point is [`map::project_line_string`], which runs
//! [`map::tessellate`], [`map::close_poles`] and [`map::repeat`] in that
//! order. Everything in [`map`] is a pure function of its inputs.
//!
//! [`data`] turns GeoJSON into the engine's input types and [`braille`]
//! provides the terminal canvas the bundled viewer draws on.

pub mod braille;
pub mod data;
pub mod map;
