//! Entry point for the component-level test tree under `tests/unit/`.

mod unit;
