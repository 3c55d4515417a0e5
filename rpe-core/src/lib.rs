mod trajectory;
pub use trajectory::*;

use sophus::nalgebra::Vector3;

pub type Real = f64;
pub type Position = Vector3<Real>;
