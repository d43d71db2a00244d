/// Errors returned by the face detector.
///
/// All variants are per-frame conditions: the caller is expected to drop the
/// frame and try the next one.
#[derive(thiserror::Error, Debug)]
pub enum FaceDetectError {
    #[error("no facelet candidates detected")]
    NoCandidates,
    #[error("face not resolved (corners={corners}, edges={edges}, need 4+4)")]
    Unresolved { corners: usize, edges: usize },
    #[error("ambiguous facelet position assignment")]
    AmbiguousAssignment,
}
