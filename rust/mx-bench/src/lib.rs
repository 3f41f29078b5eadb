//! mx-bench: criterion benchmarks live under `benches/`.
