use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid page configuration: {0}")]
    InvalidPage(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("target {id}: position needs both x_mm and y_mm")]
    PartialPosition { id: usize },

    #[error("{item}: diameter {diameter_mm} mm is not positive and finite")]
    InvalidDiameter { item: String, diameter_mm: f64 },

    #[error(
        "target {id}: footprint {footprint_mm} mm exceeds the usable page \
         interior {usable_w_mm} x {usable_h_mm} mm"
    )]
    TargetTooLarge {
        id: usize,
        footprint_mm: f64,
        usable_w_mm: f64,
        usable_h_mm: f64,
    },

    #[error("{item} extends outside the page margins")]
    OutsideMargins { item: String },

    #[error("{first} and {second} overlap")]
    Overlap { first: String, second: String },

    #[error("layout needs {needed} pages but only {allowed} are allowed")]
    PageLimitExceeded { needed: usize, allowed: usize },

    #[error(transparent)]
    Code(#[from] cct::CodeError),

    #[cfg(feature = "serde")]
    #[error("sheet config error: {0}")]
    Config(String),
}
