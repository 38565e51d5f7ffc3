use thiserror::Error;

use crate::domain::NodeId;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("no obstacle registered for `{0}`")]
    UnknownShape(NodeId),
}
