pub enum ControllerMessage {
	TogglePause,
	FrameForward,
	ToggleBall,
}
