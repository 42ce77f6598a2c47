#![warn(missing_docs)]

//! Shapes for the relief renderer.
//!
//! This crate provides the shape interface consumed by a renderer's generic
//! shape-handling code, and a height-field shape that intersects rays
//! directly by marching its elevation grid instead of building a triangle
//! mesh.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with origin, direction and a valid parametric interval
//! - [`Aabb3`] - Axis-aligned box with slab-test ray clipping
//! - [`DifferentialGeometry`] - Local surface description at a hit
//! - [`Shape`] - The polymorphic shape capability set
//! - [`ParamSet`] - Typed scene-description parameters
//! - [`heightfield`] - Grid storage, triangulation, traversal and shading
//!
//! # Example
//!
//! ```
//! use relief_math::{Point3, Transform, Vec3};
//! use relief_shapes::{Heightfield, Ray, Shape, ShadingMode};
//!
//! let hf = Heightfield::new(Transform::identity(), false, 2, 2, &[0.0; 4], ShadingMode::Flat)
//!     .unwrap();
//! let ray = Ray::new(Point3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = hf.intersect(&ray).unwrap();
//! assert!((hit.t_hit - 1.0).abs() < 1e-12);
//! ```

mod bbox;
mod error;
mod geometry;
mod params;
mod ray;
mod shape;
pub mod heightfield;

pub use bbox::Aabb3;
pub use error::{Result, ShapeError};
pub use geometry::{DifferentialGeometry, Intersection};
pub use heightfield::{Heightfield, ShadingMode};
pub use params::{ParamSet, ParamValue};
pub use ray::Ray;
pub use shape::{Shape, ShapeBase, ShapeId, ShapeRef};
