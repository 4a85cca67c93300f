use std::time::SystemTime;

use cloth::cworld::CWorld;

fn main() {
	let mut world = match CWorld::new(64, 64) {
		Ok(world) => world.with_running(),
		Err(e) => {
			eprintln!("ERROR: cloth setup failed: {}", e);
			return;
		}
	};
	let start = SystemTime::now();
	let rframes = 100;
	let frame = 1. / 60.;
	for _ in 0..rframes {
		world.update(frame);
	}
	let time = rframes as f32 * frame;
	let duration =
		SystemTime::now().duration_since(start).unwrap().as_micros();
	eprintln!("{:.3}%", duration as f32 / time / 1e4);
}
