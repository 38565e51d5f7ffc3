use thiserror::Error;

use crate::domain::NodeId;

#[derive(Error, Debug)]
pub enum ViewStateError {
    /// `requireGeometry` found no `node`/`group` entry for this id
    /// (spec §4.3, §7 MissingGeometryError).
    #[error("missing geometry for `{0}`")]
    MissingGeometry(NodeId),
}
