/// Data layer: spectrum model and loading.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectrumContext
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ SpectrumContext  │  ppm axis, intensities, metadata
///   └─────────────────┘
/// ```

pub mod loader;
pub mod model;
