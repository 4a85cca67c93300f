pub mod anchor;
pub mod cloth_model;
pub mod constraint;
pub mod controller_message;
pub mod cworld;
pub mod error;
pub mod particle;
pub mod sphere;

pub type V2 = nalgebra::Vector2<f32>;
pub type V3 = nalgebra::Vector3<f32>;
