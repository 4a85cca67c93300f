use std::sync::{Arc, RwLock};

use crate::{V2, V3};
use protocol::pr_model::PrVertex;

pub type PRef = Arc<RwLock<Particle>>;

#[derive(Clone)]
pub struct Particle {
	pub pos: V3,
	pub ppos: V3,
	pub normal: V3,
	pub uv: V2,
}

impl Particle {
	pub fn new_ref(pos: V3, normal: V3, uv: V2) -> PRef {
		let result = Self {
			pos,
			ppos: pos,
			normal,
			uv,
		};
		Arc::new(RwLock::new(result))
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn add_pos(&mut self, dp: V3) {
		self.pos += dp
	}

	pub fn set_pos(&mut self, p: V3) {
		self.pos = p;
	}

	// position verlet, velocity is implicit in pos - ppos
	pub fn update(&mut self, accel: V3, t: f32) {
		let ppos = self.pos;
		let dp = self.pos - self.ppos + accel * t * t;
		self.pos += dp;
		self.ppos = ppos;
	}

	pub fn render(&self) -> PrVertex {
		PrVertex {
			pos: self.pos.into(),
			normal: self.normal.into(),
			uv: self.uv.into(),
		}
	}
}
