use crate::particle::PRef;

// start < end for every grid constraint, so locks are taken in index order
#[derive(Clone, Copy, Debug, Default)]
pub struct Constraint {
	pub start: usize,
	pub end: usize,
	pub rest: f32,
}

impl Constraint {
	pub fn new(start: usize, end: usize, rest: f32) -> Self {
		Self { start, end, rest }
	}

	// single relaxation sweep: both endpoints move by half the error so
	// the pair ends up exactly at rest distance
	pub fn relax(&self, particles: &[PRef]) {
		let mut p1 = particles[self.start].write().unwrap();
		let mut p2 = particles[self.end].write().unwrap();
		let dp = p2.get_pos() - p1.get_pos();
		let l = dp.magnitude();
		if !l.is_normal() {
			return;
		}
		let correct = dp * ((l - self.rest) / l * 0.5);
		p1.add_pos(correct);
		p2.add_pos(-correct);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::particle::Particle;
	use crate::{V2, V3};

	fn pair(a: V3, b: V3) -> Vec<PRef> {
		let normal = V3::new(0., 1., 0.);
		vec![
			Particle::new_ref(a, normal, V2::new(0., 0.)),
			Particle::new_ref(b, normal, V2::new(1., 0.)),
		]
	}

	#[test]
	fn test_relax_restores_rest_distance() {
		let particles = pair(V3::new(0., 0., 0.), V3::new(0.2, 0., 0.));
		let con = Constraint::new(0, 1, 0.5);
		con.relax(&particles);
		let p1 = particles[0].read().unwrap().get_pos();
		let p2 = particles[1].read().unwrap().get_pos();
		assert!(((p2 - p1).magnitude() - 0.5).abs() < 1e-6);
		// corrections are equal and opposite
		assert!((p1 - V3::new(-0.15, 0., 0.)).magnitude() < 1e-6);
		assert!((p2 - V3::new(0.35, 0., 0.)).magnitude() < 1e-6);
	}

	#[test]
	fn test_relax_pulls_stretched_pair_back() {
		let particles = pair(V3::new(0., 0., 0.), V3::new(2., 0., 0.));
		let con = Constraint::new(0, 1, 1.);
		con.relax(&particles);
		let p1 = particles[0].read().unwrap().get_pos();
		let p2 = particles[1].read().unwrap().get_pos();
		assert!(((p2 - p1).magnitude() - 1.).abs() < 1e-6);
	}

	#[test]
	fn test_relax_skips_coincident_pair() {
		let particles = pair(V3::new(0.3, 0.3, 0.3), V3::new(0.3, 0.3, 0.3));
		let con = Constraint::new(0, 1, 0.5);
		con.relax(&particles);
		let p1 = particles[0].read().unwrap().get_pos();
		let p2 = particles[1].read().unwrap().get_pos();
		assert_eq!(p1, V3::new(0.3, 0.3, 0.3));
		assert_eq!(p2, V3::new(0.3, 0.3, 0.3));
	}
}
