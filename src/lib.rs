//! Additively-weighted (Apollonius) Voronoi diagrams of 3-D balls, and the
//! exact inter-ball contact surfaces derived from them.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use apollota::{triangulate, vertices_vector, Ball, Point, TriangulationConfig};
//!
//! let balls = vec![
//!     Ball::new(Point::new(0.0, 0.0, 0.0), 1.0),
//!     Ball::new(Point::new(3.0, 0.0, 0.0), 1.0),
//!     Ball::new(Point::new(1.5, 2.598, 0.0), 1.0),
//!     Ball::new(Point::new(1.5, 0.866, 2.449), 1.0),
//! ];
//! let config = TriangulationConfig::default();
//! let triangulation = triangulate(&balls, &config).unwrap();
//! println!("{} empty tangent spheres found", vertices_vector(&triangulation).len());
//! ```
//!
//! # Features
//!
//! - `serde`: enables serialization support for [`Ball`], [`TriangulationConfig`],
//!   and [`ContactConfig`].

pub mod area;
pub mod bsh;
pub mod collision;
pub mod config;
pub mod contour;
pub mod error;
pub mod geometry;
pub mod icosahedron;
pub mod remainder;
pub mod triangulation;
pub mod validate;

#[cfg(test)]
pub mod testutil;

pub use area::{contour_area, remainder_area, total_contour_area, Triangle};
pub use config::{ContactConfig, ContactConfigBuilder, TriangulationConfig, TriangulationConfigBuilder};
pub use contour::{contact_contour, Contour};
pub use error::{ApollotaError, Result};
pub use geometry::{Ball, Pair, Point, Quadruple, Triple};
pub use remainder::contact_remainder;
pub use triangulation::{triangulate, vertices_vector, Triangulation, TriangulationStats};
