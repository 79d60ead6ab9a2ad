use thiserror::Error;

/// Errors raised while building, feeding or training a `Network`.
///
/// Contract violations inside a layer (running delta or update operations
/// before a forward pass) are not represented here; they panic.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// An input vector's length disagrees with the layer's input width.
    #[error("layer {layer}: expected input of length {expected}, got {actual}")]
    ShapeMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    /// Two adjacent layers do not agree on the width of the vector between them.
    #[error("layer {layer}: input width {actual} does not match previous layer output width {expected}")]
    LayerChainMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },

    /// Weight or bias values supplied for a layer have the wrong length.
    #[error("layer parameters: expected {expected} values, got {actual}")]
    ParameterLength { expected: usize, actual: usize },

    #[error("a network needs at least one layer")]
    EmptyNetwork,

    /// Softmax has no element-wise derivative, so it may only be the output layer.
    #[error("layer {layer}: softmax is only supported as the output layer")]
    SoftmaxHiddenLayer { layer: usize },

    #[error("sample {index}: label {label} is outside the {classes} output classes")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },

    #[error("dataset has {patterns} patterns but {labels} labels")]
    DatasetLengthMismatch { patterns: usize, labels: usize },

    #[error("invalid training parameters: {0}")]
    InvalidParameters(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    /// Re-labels a shape mismatch reported by a standalone layer with the
    /// layer's position in the network.
    pub fn at_layer(self, index: usize) -> NetworkError {
        match self {
            NetworkError::ShapeMismatch { expected, actual, .. } => {
                NetworkError::ShapeMismatch { layer: index, expected, actual }
            }
            other => other,
        }
    }
}

/// Errors raised while reading an IDX image/label pair from disk or memory.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decompress gzip data from '{path}': {source}")]
    Decompress {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IDX {kind} file: {message}")]
    BadHeader { kind: &'static str, message: String },

    #[error("IDX {kind} file truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("image file holds {images} items but label file holds {labels}")]
    CountMismatch { images: usize, labels: usize },
}
