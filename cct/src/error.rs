use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("bit count {0} is odd; opposite-sector pairing requires an even count")]
    OddBits(u32),

    #[error("bit count must be positive")]
    ZeroBits,

    #[error("bit count {0} exceeds the supported maximum of 32")]
    TooManyBits(u32),

    #[error("transition count must be positive")]
    ZeroTransitions,

    #[cfg(feature = "serde")]
    #[error("scheme config error: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("ID {id} is out of range; the codebook holds {count} codes")]
    InvalidId { id: usize, count: usize },

    #[error("code {code:#x} does not fit in {bits} bits")]
    OutOfRange { code: u64, bits: u32 },

    #[error("code {0:#x} has odd parity")]
    OddParity(u64),

    #[error("code {0:#x} has no diametrically opposite sector pair")]
    NoOppositePair(u64),

    #[error("code {code:#x} has {got} transitions, scheme requires {want}")]
    TransitionMismatch { code: u64, got: u32, want: u32 },

    #[error("codes {a:#x} and {b:#x} collide under rotation")]
    RotationCollision { a: u64, b: u64 },
}
