/// Progress of a generation pass.
///
/// `Idle -> BlocksFound -> Shrunk -> Carved -> Projected`. A new pass starts
/// again from `BlocksFound`; `reset()` returns to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GenerationStage {
    #[default]
    Idle,
    BlocksFound,
    Shrunk,
    Carved,
    /// Lots and buildings published.
    Projected,
}

impl GenerationStage {
    pub fn label(self) -> &'static str {
        match self {
            GenerationStage::Idle => "Idle",
            GenerationStage::BlocksFound => "Blocks found",
            GenerationStage::Shrunk => "Shrunk",
            GenerationStage::Carved => "Carved",
            GenerationStage::Projected => "Projected",
        }
    }
}
