// pr_model: cloth mesh snapshot for rendering

#[derive(Clone, Copy, Debug)]
pub struct PrVertex {
	pub pos: [f32; 3],
	pub normal: [f32; 3],
	pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct PrMesh {
	pub vertices: Vec<PrVertex>,
	pub indices: Vec<u32>,
}

impl PrMesh {
	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}
}
