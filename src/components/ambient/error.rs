//! Setup failures for the ambient background.
//!
//! None of these reach the user. The component logs them and renders a
//! static, empty canvas instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
	#[error("no global window")]
	NoWindow,
	#[error("hero element is not attached to the document")]
	NoHost,
	#[error("canvas did not provide a 2d context")]
	NoContext,
	#[error("canvas context request failed: {0}")]
	Context(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_missing_piece() {
		assert_eq!(MountError::NoHost.to_string(), "hero element is not attached to the document");
		assert_eq!(
			MountError::Context("SecurityError".into()).to_string(),
			"canvas context request failed: SecurityError"
		);
	}
}
