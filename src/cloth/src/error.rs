use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClothError {
	InvalidParameters { width: usize, height: usize },
	AllocationFailure { what: &'static str },
	ResourceCreationFailure { what: &'static str },
}

impl fmt::Display for ClothError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidParameters { width, height } => {
				write!(f, "invalid cloth dimensions {}x{}", width, height)
			}
			Self::AllocationFailure { what } => {
				write!(f, "cannot allocate {} buffer", what)
			}
			Self::ResourceCreationFailure { what } => {
				write!(f, "cannot create {}", what)
			}
		}
	}
}

impl std::error::Error for ClothError {}
