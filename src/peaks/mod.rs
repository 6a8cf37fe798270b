/// Peak picking: from a user selection to the peak table.
///
/// ```text
///   region pick                       point pick
///       │                                 │
///       ▼                                 │
///  ┌─────────────┐                        │
///  │ orientation  │  choose trace, fix y   │
///  └─────────────┘                        │
///       │                                 │
///       ▼                                 │
///  ┌─────────────┐                        │
///  │   detect     │  candidate indices     │
///  └─────────────┘                        │
///       │                                 │
///       ▼                                 │
///  ┌─────────────┐                        │
///  │   filter     │  keep those in the box │
///  └─────────────┘                        │
///       │                                 │
///       ▼                                 ▼
///  ┌──────────────────────────────────────────┐
///  │ peak_set   merge → sort → diff → store    │
///  └──────────────────────────────────────────┘
///       │
///       ▼
///  highlight / report / observers
/// ```

pub mod controller;
pub mod detect;
pub mod filter;
pub mod highlight;
pub mod orientation;
pub mod peak_set;
pub mod report;
