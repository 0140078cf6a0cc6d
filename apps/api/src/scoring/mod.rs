// Resume/job fit scoring engine.
// Tokenize → extract keywords → score → checklist. Everything here is pure and
// in-memory except the debounced session layer, which only schedules work.

pub mod calculator;
pub mod checklist;
pub mod debounce;
pub mod handlers;
pub mod keywords;
pub mod session;
pub mod tiered;
pub mod tokenizer;
