pub enum ControllerMessage {
	IncreaseWind,
	DecreaseWind,
	ZeroWind,
	ToggleAnchors,
	ToggleRunning,
}
