use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, SystemTime};

use tracing::info;

use crate::cloth::Cloth;
use crate::collider::{Collider, Cube, Sphere};
use crate::config::SimConfig;
use crate::controller_message::ControllerMessage;
use crate::error::ClothError;
use crate::V3;
use protocol::frame_model::FrameModel;

/// The simulation context: the cloth, the scene forces and colliders, and
/// the frame clock. One `run()` is one simulated frame in fixed phase
/// order; external readers consume `frame_model()` between frames.
pub struct ClothWorld {
	pub config: SimConfig,
	/// Wall-clock seconds per frame for the threaded loop.
	pub frame_time: f32,
	gravity: V3,
	wind: V3,
	ball: Sphere,
	ball_active: bool,
	cube: Option<Cube>,
	frame: u64,

	// -1: always play
	// 0: pause
	// n: play n frames
	forward_frames: i32,

	cloth: Cloth,
}

impl ClothWorld {
	pub fn new(config: SimConfig, cloth: Cloth) -> Result<Self, ClothError> {
		config.validate()?;
		Ok(Self {
			config,
			frame_time: 0.02,
			gravity: V3::zeros(),
			wind: V3::zeros(),
			ball: Sphere {
				center: V3::new(7., -5., 0.),
				radius: 2.,
			},
			ball_active: false,
			cube: None,
			frame: 0,
			forward_frames: -1,
			cloth,
		})
	}

	/// The hanging-flag scene: a 55x50 cloth pinned along one edge,
	/// light gravity, a diagonal breeze and the swinging ball.
	pub fn demo() -> Result<Self, ClothError> {
		let cloth = Cloth::new(15., 10., 55, 50)?
			.with_pinned_edge(V3::new(0., 0.5, 0.));
		let mut world = Self::new(SimConfig::default(), cloth)?;
		world.gravity = V3::new(0., -0.2, 0.);
		world.wind = V3::new(1.5, 0., 0.2);
		world.ball_active = true;
		info!("demo world ready");
		Ok(world)
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_wind(mut self, wind: V3) -> Self {
		self.wind = wind;
		self
	}

	pub fn with_ball(mut self, center: V3, radius: f32) -> Self {
		self.ball = Sphere { center, radius };
		self.ball_active = true;
		self
	}

	pub fn with_cube(mut self, center: V3, size: f32) -> Self {
		self.cube = Some(Cube { center, size });
		self
	}

	pub fn with_paused(mut self) -> Self {
		self.forward_frames = 1; // provide first frame
		self
	}

	pub fn cloth(&self) -> &Cloth {
		&self.cloth
	}

	pub fn cloth_mut(&mut self) -> &mut Cloth {
		&mut self.cloth
	}

	pub fn is_paused(&self) -> bool {
		self.forward_frames == 0
	}

	pub fn ball_active(&self) -> bool {
		self.ball_active
	}

	/// One simulated frame: forces, relaxation + integration, collision,
	/// normals. The phase order is load-bearing and must not change.
	pub fn run(&mut self) {
		self.frame += 1;
		// the ball swings through the cloth plane
		self.ball.center[2] = (self.frame as f32 / 50.).cos() * 7.;

		let step2 = self.config.step2;
		self.cloth.add_force(self.gravity * step2);
		self.cloth.add_wind(self.wind * step2);
		self.cloth.step(&self.config);
		if self.ball_active {
			self.cloth
				.resolve_sphere_collision(self.ball.center, self.ball.radius);
		}
		if let Some(cube) = self.cube {
			self.cloth.resolve_collision(&Collider::Cube(cube));
		}
		self.cloth.recompute_normals();
	}

	pub fn frame_model(&self) -> FrameModel {
		self.cloth.frame_model()
	}

	fn handle_message(&mut self, msg: ControllerMessage) {
		match msg {
			ControllerMessage::TogglePause => {
				if self.forward_frames == 0 {
					self.forward_frames = -1;
				} else {
					self.forward_frames = 0;
				}
			}
			ControllerMessage::FrameForward => {
				if self.forward_frames == 0 {
					self.forward_frames += 1;
				}
			}
			ControllerMessage::ToggleBall => {
				self.ball_active = !self.ball_active;
			}
		}
	}

	/// Frame-locked driver loop: simulate, publish a snapshot, drain
	/// control messages, sleep off the rest of the frame budget. Returns
	/// when the receiving side hangs up.
	pub fn run_thread(
		&mut self,
		tx: Sender<FrameModel>,
		rx: Receiver<ControllerMessage>,
	) {
		let mut start_time = SystemTime::now();
		let rtime = (self.frame_time * 1e6) as u64;
		let mut first_frame = true;
		loop {
			if self.forward_frames != 0 {
				if self.forward_frames > 0 {
					self.forward_frames -= 1;
				}
				if !first_frame {
					self.run();
				} else {
					first_frame = false;
				}
				if tx.send(self.frame_model()).is_err() {
					return;
				}
			}

			while let Ok(msg) = rx.try_recv() {
				self.handle_message(msg);
			}

			let next_time = SystemTime::now();
			let dt = next_time
				.duration_since(start_time)
				.unwrap_or_default()
				.as_micros() as u64;
			if dt < rtime {
				std::thread::sleep(Duration::from_micros(rtime - dt));
			}
			start_time = next_time;
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_demo_scene() {
		let world = ClothWorld::demo().unwrap();
		assert_eq!(world.cloth().nx(), 55);
		assert!(world.ball_active());
		assert!(!world.is_paused());
		let model = world.frame_model();
		assert_eq!(model.particles.len(), 55 * 50);
		assert_eq!(model.triangles.len(), 2 * 54 * 49);
	}

	#[test]
	fn test_run_keeps_pinned_column() {
		let mut world = ClothWorld::demo().unwrap();
		let before: Vec<_> = (0..50)
			.map(|y| world.cloth().particle(0, y).get_pos())
			.collect();
		for _ in 0..5 {
			world.run();
		}
		for (y, pos) in before.iter().enumerate() {
			assert_eq!(world.cloth().particle(0, y).get_pos(), *pos);
		}
	}

	#[test]
	fn test_invalid_config_rejected() {
		let cloth = Cloth::new(1., 1., 2, 2).unwrap();
		let config = SimConfig::default().with_iterations(0);
		assert!(ClothWorld::new(config, cloth).is_err());
	}

	#[test]
	fn test_pause_protocol() {
		let cloth = Cloth::new(1., 1., 2, 2).unwrap();
		let mut world =
			ClothWorld::new(SimConfig::default(), cloth).unwrap();
		assert!(!world.is_paused());
		world.handle_message(ControllerMessage::TogglePause);
		assert!(world.is_paused());
		world.handle_message(ControllerMessage::FrameForward);
		assert_eq!(world.forward_frames, 1);
		world.handle_message(ControllerMessage::TogglePause);
		assert!(world.is_paused());
		world.handle_message(ControllerMessage::TogglePause);
		assert!(!world.is_paused());
		world.handle_message(ControllerMessage::ToggleBall);
		assert!(world.ball_active());
	}
}
