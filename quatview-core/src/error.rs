use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("cannot rotate around a zero vector (|axis| = {magnitude})")]
    DegenerateAxis { magnitude: f64 },

    #[error("rotation angle must be finite (got {angle})")]
    NonFiniteAngle { angle: f64 },

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
