use thiserror::Error;

use crate::viewstate::ViewStateError;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// The scope or one of its children had no ViewState geometry to seed
    /// the layout engine with.
    #[error(transparent)]
    ViewState(#[from] ViewStateError),

    /// The external layout engine rejected or failed to lay out the input.
    #[error("layout engine failed: {0}")]
    Engine(String),
}
