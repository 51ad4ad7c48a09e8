use std::time::SystemTime;

use drape::world::ClothWorld;

fn main() {
	tracing_subscriber::fmt::init();
	let mut world = ClothWorld::demo().expect("demo scene");
	let start = SystemTime::now();
	let rframes = 100;
	for _ in 0..rframes {
		world.run();
	}
	let duration =
		SystemTime::now().duration_since(start).unwrap().as_micros();
	let time = rframes as f32 * world.frame_time;
	tracing::info!("{:.3}%", duration as f32 / time / 1e4);
}
