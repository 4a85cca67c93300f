use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, SystemTime};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::cloth_model::ClothModel;
use crate::controller_message::ControllerMessage;
use crate::error::ClothError;
use crate::sphere::Sphere;
use crate::V3;
use protocol::pr_model::PrMesh;
use protocol::user_event::{UpdateInfo, UserEvent};

const GRAVITY: f32 = -9.8;
const WIND_STEP: f32 = 2.0;
const WIND_LIMIT: f32 = 20.0;

pub struct CWorld {
	pub dt: f32,
	leftover: f32,
	wind: f32,
	anchored: bool,
	running: bool,
	sphere: Sphere,
	cloth: ClothModel,
	pool: ThreadPool,
}

impl CWorld {
	pub fn new(width: usize, height: usize) -> Result<Self, ClothError> {
		let cloth = ClothModel::new(width, height)?;
		let pool = rayon::ThreadPoolBuilder::new().build().map_err(|_| {
			ClothError::ResourceCreationFailure {
				what: "compute pool",
			}
		})?;
		eprintln!(
			"INFO: cloth {}x{}, {} constraints in {} batches",
			width,
			height,
			cloth.constraints.len(),
			cloth.batch_sizes.len(),
		);
		Ok(Self {
			dt: 0.0017,
			leftover: 0.,
			wind: 0.,
			anchored: true,
			running: false,
			sphere: Sphere::default(),
			cloth,
			pool,
		})
	}

	pub fn with_dt(mut self, dt: f32) -> Self {
		self.dt = dt;
		self
	}

	pub fn with_sphere(mut self, sphere: Sphere) -> Self {
		self.sphere = sphere;
		self
	}

	pub fn with_running(mut self) -> Self {
		self.running = true;
		self
	}

	pub fn handle(&mut self, msg: ControllerMessage) {
		match msg {
			ControllerMessage::IncreaseWind => {
				self.wind = (self.wind + WIND_STEP).min(WIND_LIMIT);
			}
			ControllerMessage::DecreaseWind => {
				self.wind = (self.wind - WIND_STEP).max(-WIND_LIMIT);
			}
			ControllerMessage::ZeroWind => self.wind = 0.,
			ControllerMessage::ToggleAnchors => {
				self.anchored = !self.anchored;
			}
			ControllerMessage::ToggleRunning => {
				self.running = !self.running;
			}
		}
	}

	// fixed-timestep accumulator; leftover keeps updating while paused so
	// resuming does not replay the pause as a burst of sub-steps
	pub fn update(&mut self, elapsed: f32) {
		if self.dt <= 0f32 {
			return;
		}
		let total = elapsed.max(0.) + self.leftover;
		let steps = (total / self.dt) as usize;
		self.leftover = total - steps as f32 * self.dt;
		if !self.running {
			return;
		}
		for _ in 0..steps {
			self.step_once();
		}
	}

	fn step_once(&mut self) {
		self.apply_forces();
		self.collide();
		self.solve_constraints();
		if self.anchored {
			self.apply_anchors();
		}
	}

	fn apply_forces(&self) {
		let accel = V3::new(0., GRAVITY, self.wind);
		let dt = self.dt;
		let particles = &self.cloth.particles;
		self.pool.install(|| {
			particles.par_iter().for_each(|p| {
				p.write().unwrap().update(accel, dt);
			});
		});
	}

	fn collide(&self) {
		let sphere = self.sphere;
		let particles = &self.cloth.particles;
		self.pool.install(|| {
			particles.par_iter().for_each(|p| {
				let mut p = p.write().unwrap();
				sphere.apply(&mut p.pos);
			});
		});
	}

	// batches run in fixed order; each batch is endpoint-disjoint so its
	// constraints relax in parallel without touching the same particle
	fn solve_constraints(&self) {
		let particles = &self.cloth.particles;
		for batch in self.cloth.batches() {
			self.pool.install(|| {
				batch.par_iter().for_each(|c| c.relax(particles));
			});
		}
	}

	fn apply_anchors(&self) {
		let particles = &self.cloth.particles;
		let anchors = &self.cloth.anchors;
		self.pool.install(|| {
			anchors.par_iter().for_each(|a| a.apply(particles));
		});
	}

	pub fn pr_mesh(&self) -> PrMesh {
		PrMesh {
			vertices: self
				.cloth
				.particles
				.iter()
				.map(|p| p.read().unwrap().render())
				.collect(),
			indices: self.cloth.indices.clone(),
		}
	}

	fn update_info(&self, load: f32) -> UpdateInfo {
		UpdateInfo {
			load,
			particle_len: self.cloth.particles.len(),
			constraint_len: self.cloth.batch_sizes.to_vec(),
		}
	}

	pub fn run_thread(
		&mut self,
		tx: Sender<UserEvent>,
		rx: Receiver<ControllerMessage>,
	) {
		let frame_time = 1. / 60.;
		let mut last = SystemTime::now();
		loop {
			while let Ok(msg) = rx.try_recv() {
				self.handle(msg);
			}
			let now = SystemTime::now();
			let elapsed = now.duration_since(last).unwrap().as_secs_f32();
			last = now;
			self.update(elapsed);
			let spent = SystemTime::now()
				.duration_since(now)
				.unwrap()
				.as_secs_f32();
			let info = self.update_info(spent / frame_time);
			if tx.send(UserEvent::Update(self.pr_mesh(), info)).is_err() {
				return;
			}
			if spent < frame_time {
				std::thread::sleep(Duration::from_secs_f32(
					frame_time - spent,
				));
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_accumulator() {
		let mut world = CWorld::new(4, 4).unwrap();
		world.update(0.01);
		// 0.01 / 0.0017 -> 5 whole steps, 0.0015 left over
		assert!((world.leftover - 0.0015).abs() < 1e-6);
		world.update(0.001);
		// 0.0025 accumulated -> one more step
		assert!((world.leftover - 0.0008).abs() < 1e-6);
	}

	#[test]
	fn test_wind_clamp() {
		let mut world = CWorld::new(4, 4).unwrap();
		for _ in 0..30 {
			world.handle(ControllerMessage::IncreaseWind);
		}
		assert_eq!(world.wind, 20.);
		for _ in 0..60 {
			world.handle(ControllerMessage::DecreaseWind);
		}
		assert_eq!(world.wind, -20.);
		world.handle(ControllerMessage::ZeroWind);
		assert_eq!(world.wind, 0.);
	}

	#[test]
	fn test_paused_world_is_frozen() {
		let mut world = CWorld::new(4, 4).unwrap();
		let before = world.pr_mesh();
		world.update(0.5);
		let after = world.pr_mesh();
		for (a, b) in before.vertices.iter().zip(after.vertices.iter()) {
			assert_eq!(a.pos, b.pos);
		}
	}

	#[test]
	fn test_resume_does_not_burst() {
		let mut world = CWorld::new(4, 4).unwrap();
		// a long pause leaves less than one step of leftover time
		world.update(5.0);
		assert!(world.leftover < world.dt);
		world.handle(ControllerMessage::ToggleRunning);
		let before = world.pr_mesh();
		world.update(0.);
		let after = world.pr_mesh();
		for (a, b) in before.vertices.iter().zip(after.vertices.iter()) {
			assert_eq!(a.pos, b.pos);
		}
	}

	#[test]
	fn test_running_world_falls() {
		let mut world = CWorld::new(4, 4).unwrap().with_running();
		world.handle(ControllerMessage::ToggleAnchors);
		world.update(0.1);
		let mesh = world.pr_mesh();
		assert!(mesh.vertices.iter().all(|v| v.pos[1] < 0.));
	}

	#[test]
	fn test_anchors_pin_exactly() {
		let mut world = CWorld::new(6, 6).unwrap().with_running();
		world.update(0.05);
		let mesh = world.pr_mesh();
		for a in &world.cloth.anchors {
			assert_eq!(V3::from(mesh.vertices[a.index].pos), a.pos);
		}
		// the rest of the top row sagged away from its start position
		assert!(mesh.vertices[1].pos[1] < 0.);
	}

	#[test]
	fn test_wind_pushes_along_z() {
		let mut world = CWorld::new(4, 4).unwrap().with_running();
		world.handle(ControllerMessage::ToggleAnchors);
		for _ in 0..5 {
			world.handle(ControllerMessage::IncreaseWind);
		}
		let before = world.pr_mesh();
		world.update(0.1);
		let after = world.pr_mesh();
		// free cloth translates uniformly: down under gravity, towards
		// +z under wind
		for (a, b) in before.vertices.iter().zip(after.vertices.iter()) {
			assert!(b.pos[2] > a.pos[2] + 0.02);
			assert!(b.pos[1] < a.pos[1] - 0.02);
		}
	}

	#[test]
	fn test_mesh_shape_is_stable() {
		let mut world = CWorld::new(5, 4).unwrap().with_running();
		let before = world.pr_mesh();
		world.update(0.2);
		let after = world.pr_mesh();
		assert_eq!(before.vertices.len(), after.vertices.len());
		assert_eq!(before.indices, after.indices);
		assert_eq!(after.triangle_count(), 4 * 3 * 2);
	}

	#[test]
	fn test_invalid_dimensions() {
		assert!(matches!(
			CWorld::new(1, 8),
			Err(ClothError::InvalidParameters { .. })
		));
	}
}
