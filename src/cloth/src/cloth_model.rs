// grid cloth topology: particles, batched constraints, anchors, render indices

use fnv::FnvHashSet;

use crate::anchor::Anchor;
use crate::constraint::Constraint;
use crate::error::ClothError;
use crate::particle::{Particle, PRef};
use crate::{V2, V3};

pub const BATCHES: usize = 8;

pub struct ClothModel {
	pub width: usize,
	pub height: usize,
	pub particles: Vec<PRef>,
	// one buffer, laid out as 8 contiguous batches
	pub constraints: Vec<Constraint>,
	pub batch_sizes: [usize; BATCHES],
	pub anchors: Vec<Anchor>,
	pub indices: Vec<u32>,
}

pub fn constraint_count(width: usize, height: usize) -> usize {
	(((width - 2) * 4) + 5) * (height - 1) + (width - 1)
}

// closed-form batch sizes, must match the parity split in new() exactly:
// 0/1 left constraints, 2/3 up, 4/5 diagonal up-left, 6/7 diagonal up-right
fn batch_sizes(width: usize, height: usize) -> [usize; BATCHES] {
	let b0 = height * (width / 2);
	let b1 = (width - 1) * height - b0;
	let b2 = width * (height / 2);
	let b3 = width * (height - 1) - b2;
	let b4 = (width - 1) * (height / 2);
	let b5 = (width - 1) * (height - 1) - b4;
	[b0, b1, b2, b3, b4, b5, b4, b5]
}

fn try_alloc<T>(len: usize, what: &'static str) -> Result<Vec<T>, ClothError> {
	let mut buf = Vec::new();
	buf.try_reserve_exact(len)
		.map_err(|_| ClothError::AllocationFailure { what })?;
	Ok(buf)
}

impl ClothModel {
	pub fn new(width: usize, height: usize) -> Result<Self, ClothError> {
		if width < 2 || height < 2 {
			return Err(ClothError::InvalidParameters { width, height });
		}
		let total = constraint_count(width, height);
		let batch_sizes = batch_sizes(width, height);

		let mut particles: Vec<PRef> = try_alloc(width * height, "particle")?;
		let mut constraints: Vec<Constraint> = try_alloc(total, "constraint")?;
		constraints.resize(total, Constraint::default());
		let mut indices: Vec<u32> =
			try_alloc((width - 1) * (height - 1) * 6, "index")?;

		let mut offsets = [0usize; BATCHES];
		let mut acc = 0;
		for (k, size) in batch_sizes.iter().enumerate() {
			offsets[k] = acc;
			acc += size;
		}
		// per-batch cursors, every constraint lands in its final slot in
		// a single pass
		let mut cursor = offsets;

		let fw = (width - 1) as f32;
		let fh = (height - 1) as f32;
		let grid_pos =
			|i: usize, j: usize| V3::new(i as f32 / fw, 0., j as f32 / fh);

		// the horizontal flag keeps flipping across row boundaries, the
		// vertical flag flips once per row
		let mut horizontal_odd = true;
		let mut vertical_odd = true;
		for j in 0..height {
			vertical_odd = !vertical_odd;
			for i in 0..width {
				horizontal_odd = !horizontal_odd;
				let index = j * width + i;
				let pos = grid_pos(i, j);
				particles.push(Particle::new_ref(
					pos,
					V3::new(0., 1., 0.),
					V2::new(i as f32 / fw, j as f32 / fh),
				));

				let mut emit = |batch: usize, start: usize, from: V3| {
					constraints[cursor[batch]] =
						Constraint::new(start, index, (pos - from).magnitude());
					cursor[batch] += 1;
				};

				if i > 0 {
					let b = if horizontal_odd { 0 } else { 1 };
					emit(b, index - 1, grid_pos(i - 1, j));
					if j > 0 {
						let b = if vertical_odd { 4 } else { 5 };
						emit(b, index - (width + 1), grid_pos(i - 1, j - 1));
					}
				}
				if j > 0 {
					let b = if vertical_odd { 2 } else { 3 };
					emit(b, index - width, grid_pos(i, j - 1));
					if i < width - 1 {
						let b = if vertical_odd { 6 } else { 7 };
						emit(b, index - (width - 1), grid_pos(i + 1, j - 1));
					}
				}

				if i < width - 1 && j < height - 1 {
					let a = index as u32;
					let b = a + width as u32;
					let c = b + 1;
					let d = a + 1;
					indices.extend_from_slice(&[a, b, d, b, c, d]);
				}
			}
		}

		// top-left, top-right, top-middle
		let anchors = [0, width - 1, width / 2]
			.iter()
			.map(|&index| Anchor {
				index,
				pos: grid_pos(index, 0),
			})
			.collect();

		let result = Self {
			width,
			height,
			particles,
			constraints,
			batch_sizes,
			anchors,
			indices,
		};
		debug_assert!((0..BATCHES)
			.all(|k| cursor[k] == offsets[k] + result.batch_sizes[k]));
		debug_assert!(result.batches_disjoint());
		Ok(result)
	}

	pub fn batch(&self, k: usize) -> &[Constraint] {
		let start: usize = self.batch_sizes[..k].iter().sum();
		&self.constraints[start..start + self.batch_sizes[k]]
	}

	pub fn batches(&self) -> impl Iterator<Item = &[Constraint]> {
		(0..BATCHES).map(move |k| self.batch(k))
	}

	// no particle may appear as an endpoint of two constraints in one
	// batch, otherwise parallel relaxation races on positions
	pub fn batches_disjoint(&self) -> bool {
		for batch in self.batches() {
			let mut seen = FnvHashSet::default();
			for c in batch {
				if !seen.insert(c.start) || !seen.insert(c.end) {
					return false;
				}
			}
		}
		true
	}
}
