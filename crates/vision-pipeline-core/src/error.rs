/// Errors raised by geometric computations on targets and frames.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A centroid was requested for a shape without area. Filter small
    /// targets out (e.g. with an area filter) before anything that needs a
    /// center.
    #[error("degenerate shape (area={area}); area-filter targets before computing centers")]
    DegenerateShape { area: f32 },
    #[error("invalid frame size (width={width}, height={height})")]
    InvalidFrameSize { width: u32, height: u32 },
    #[error("no targets to compute a center from")]
    NoTargets,
}
