/// Data layer: series types and loading.
///
/// Architecture:
/// ```text
///  data/<kind>.dat  ("<year> <value>" per line)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse lines → Series
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ TrendData  │  one ordered Series per SeriesKind
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
