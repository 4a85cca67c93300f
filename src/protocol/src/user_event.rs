use crate::pr_model::PrMesh;

#[derive(Debug)]
pub enum UserEvent {
	Update(PrMesh, UpdateInfo),
}

#[derive(Clone, Debug)]
pub struct UpdateInfo {
	pub load: f32,
	pub particle_len: usize,
	pub constraint_len: Vec<usize>,
}
