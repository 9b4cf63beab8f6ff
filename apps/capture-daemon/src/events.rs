use serde::Deserialize;

/// One line of the stdin protocol shared with the external tracker
/// process. Frames carry landmarks; keys are the operator's discrete
/// actions; labels only matter in record mode.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CaptureEvent {
    Frame { points: Vec<[f32; 2]> },
    Key { key: KeyEvent },
    Label { label: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEvent {
    Commit,
    Undo,
    Flush,
    Quit,
}
