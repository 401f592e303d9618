mod bounds;
mod common;
mod normal;
mod point;
mod ray;
mod spectrum;
mod vector;

pub use bounds::{Bounds2, Bounds3};
pub use common::{FloatValueType, ValueType};
pub use normal::Normal;
pub use point::{Point2, Point3};
pub use ray::Ray;
pub use spectrum::Spectrum;
pub use vector::{Vec2, Vec3};
