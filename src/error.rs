pub type MapResult<T> = Result<T, MapError>;

/// Structural problems found while validating a tilemap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map has no tiles")]
    EmptyMap,

    #[error("map has {tiles} tiles but {things} things")]
    SizeMismatch { tiles: usize, things: usize },

    #[error("map is {width} tiles wide but holds {len} tiles")]
    RaggedRows { width: usize, len: usize },

    #[error("map has no player spawn")]
    MissingPlayer,

    #[error("door at ({x}, {y}) is on the map edge")]
    DoorOnEdge { x: usize, y: usize },

    #[error("switch at ({x}, {y}) is not on a wall tile")]
    SwitchNotOnWall { x: usize, y: usize },

    #[error("pushwall at ({x}, {y}) is not on a wall tile")]
    PushwallNotOnWall { x: usize, y: usize },
}
