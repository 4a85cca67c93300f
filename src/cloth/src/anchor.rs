use crate::particle::PRef;
use crate::V3;

#[derive(Clone, Copy, Debug)]
pub struct Anchor {
	pub index: usize,
	pub pos: V3,
}

impl Anchor {
	// overrides whatever forces, collision and relaxation did this sub-step;
	// ppos is left alone, the next force pass resets it to the pinned position
	pub fn apply(&self, particles: &[PRef]) {
		particles[self.index].write().unwrap().set_pos(self.pos);
	}
}
